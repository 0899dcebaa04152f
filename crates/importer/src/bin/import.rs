use clap::Parser;
use importer::{ImportContext, ImportKind, run_import};
use std::path::PathBuf;
use storage::{Database, RequestContext, repository::user::UserRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "import")]
#[command(about = "Import tab-separated training data for one user", long_about = None)]
#[command(version)]
struct Cli {
    /// lift-logs, exercises, body-logs (or measurement-logs), food-logs or workouts
    kind: ImportKind,

    /// TSV file to read
    file: PathBuf,

    /// Owner of the imported records
    #[arg(long)]
    user: i64,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("import={},importer={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Reading {} from: {}", cli.kind, cli.file.display());
    let data = tokio::fs::read_to_string(&cli.file).await?;

    tracing::info!("Connecting to database...");
    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;

    let user = UserRepository::new(db.pool()).find_by_id(cli.user).await?;
    tracing::info!("Importing for user {} ({})", user.user_id, user.name);

    let context = ImportContext::new(db.pool().clone(), RequestContext::new(user.user_id));
    let summary = run_import(cli.kind, &data, &context).await?;

    println!("{}", summary.message());

    Ok(())
}
