pub mod error;
pub mod traits;
pub mod tsv;

pub use error::{ImporterError, Result};
pub use traits::{ImportContext, TsvImporter};
pub use tsv::{ImportKind, run_import};
