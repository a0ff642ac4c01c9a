//! Address import entry point - parses arguments and runs one import

use address_import::cli::Cli;
use address_import::config::Config;
use address_import::ingestion::pipeline::{self, ImportOutcome, ImportRequest};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    Config::load_dotenv();
    let config = Config::from_env();

    info!("Starting address import");

    let request = match ImportRequest::resolve(cli, &config) {
        Ok(request) => request,
        Err(e) => {
            error!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&request, &config).await {
        Ok(outcome) => {
            match outcome {
                ImportOutcome::DryRun(summary) => {
                    info!("✓ Dry run complete: {} addresses", summary.total)
                }
                ImportOutcome::CsvWritten { path, rows } => {
                    info!("✓ Wrote {} addresses to {:?}", rows, path)
                }
                ImportOutcome::CsvFailed { path, reason } => {
                    warn!("CSV export to {:?} failed: {}", path, reason)
                }
                ImportOutcome::Database(stats) => info!("✓ Database import complete: {}", stats),
            }
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("✗ Import failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
