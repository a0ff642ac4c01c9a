//! Error kinds the pipeline needs to tell apart

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("city '{0}' not found in the address directory")]
    CityNotFound(String),

    #[error("address directory returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("address directory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("--{flag} is required for --source {source_name}")]
    MissingArgument {
        flag: &'static str,
        source_name: &'static str,
    },

    #[error("DATABASE_URL is not set (use --output or --dry-run to skip the database)")]
    MissingDatabaseUrl,

    #[error("no addresses were loaded")]
    NoAddresses,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
