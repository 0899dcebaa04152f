use clap::Parser;
use std::process::ExitCode;
use storage::Database;
use storage::repository::lift_log::LiftLogRepository;
use storage::services::personal_records::{HistoricalPrOptions, recalculate_historical};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prs:calculate-historical")]
#[command(
    about = "Replay lift history and rebuild PR flags and personal records",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Only this user's logs
    #[arg(long)]
    user: Option<i64>,

    /// Only logs of this exercise
    #[arg(long)]
    exercise: Option<i64>,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

async fn confirm<R, W>(log_count: i64, input: &mut R, output: &mut W) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(
            format!(
                "This will recalculate PR flags for {} lift logs and rebuild their personal records. Continue? [y/N] ",
                log_count
            )
            .as_bytes(),
        )
        .await?;
    output.flush().await?;

    let mut answer = String::new();
    input.read_line(&mut answer).await?;

    Ok(is_confirmed(&answer))
}

/// Counts the logs in scope, asks for confirmation unless forced or dry,
/// then replays history and prints the report.
async fn run<R, W>(
    cli: &Cli,
    db: &Database,
    mut input: R,
    output: &mut W,
) -> Result<ExitCode, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let log_count = LiftLogRepository::new(db.pool())
        .count_live(cli.user, cli.exercise)
        .await?;

    if log_count == 0 {
        say(output, "No lift logs found to process.").await?;
        return Ok(ExitCode::FAILURE);
    }

    say(output, &format!("Found {} lift logs to process.", log_count)).await?;

    if !cli.force && !cli.dry_run && !confirm(log_count, &mut input, output).await? {
        say(output, "Aborted. No changes were made.").await?;
        return Ok(ExitCode::SUCCESS);
    }

    let options = HistoricalPrOptions {
        user_id: cli.user,
        exercise_id: cli.exercise,
        dry_run: cli.dry_run,
    };
    let report = recalculate_historical(db.pool(), &options).await?;

    if cli.dry_run {
        say(output, "Dry run: no changes were written.").await?;
    }
    say(output, &format!("Exercise histories processed: {}", report.pairs_processed)).await?;
    say(output, &format!("Lift logs processed: {}", report.logs_processed)).await?;
    say(output, &format!("PRs found: {}", report.prs_found)).await?;
    say(
        output,
        &format!(
            "Lift logs {}: {}",
            if cli.dry_run { "that would change" } else { "changed" },
            report.logs_changed
        ),
    )
    .await?;

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("prs={},storage={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;

    run(
        &cli,
        &db,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
    )
    .await
}
