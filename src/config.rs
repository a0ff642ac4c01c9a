//! Runtime configuration read from the environment

use std::env;

/// Default KLADR endpoint
pub const DEFAULT_KLADR_API_URL: &str = "http://kladr-api.ru/api.php";

/// Configuration loaded once at startup and passed to whatever needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Only required by the database sink
    pub database_url: Option<String>,
    pub kladr_api_url: String,
}

impl Config {
    /// Load `.env.local` and `.env` (if present) into the process environment.
    /// Values already set in the environment win.
    pub fn load_dotenv() {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();
    }

    pub fn from_env() -> Self {
        Config {
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            kladr_api_url: env::var("KLADR_API_URL")
                .unwrap_or_else(|_| DEFAULT_KLADR_API_URL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            kladr_api_url: DEFAULT_KLADR_API_URL.to_string(),
        }
    }
}
