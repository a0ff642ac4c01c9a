//! Import orchestrator - resolves the request and runs fetch, process, write

use crate::cli::{Cli, SourceKind};
use crate::config::Config;
use crate::ingestion::error::IngestionError;
use crate::ingestion::fetch::{fetch_from_2gis, fetch_from_kladr, DirectoryApi, KladrClient};
use crate::ingestion::parse::read_csv_source;
use crate::ingestion::process::{self, process_addresses};
use crate::ingestion::types::{AddressRecord, ImportSummary, WriteStats};
use crate::ingestion::write::{save_to_csv, save_to_database};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

/// Where addresses come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Kladr { city: String },
    TwoGis { api_key: String, city: String },
    Csv { path: PathBuf },
}

/// Where addresses go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Database { database_url: String },
    Csv { path: PathBuf },
    DryRun,
}

/// Validated import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub source: Source,
    pub sink: Sink,
}

impl ImportRequest {
    /// Check source-specific arguments and pick the sink.
    ///
    /// `--dry-run` beats `--output`, which beats the database.
    pub fn resolve(cli: Cli, config: &Config) -> Result<Self, IngestionError> {
        let source = match cli.source {
            SourceKind::Kladr => Source::Kladr { city: cli.city },
            SourceKind::TwoGis => Source::TwoGis {
                api_key: cli.api_key.ok_or(IngestionError::MissingArgument {
                    flag: "api-key",
                    source_name: "2gis",
                })?,
                city: cli.city,
            },
            SourceKind::Csv => Source::Csv {
                path: cli.file.ok_or(IngestionError::MissingArgument {
                    flag: "file",
                    source_name: "csv",
                })?,
            },
        };

        let sink = if cli.dry_run {
            Sink::DryRun
        } else if let Some(path) = cli.output {
            Sink::Csv { path }
        } else {
            Sink::Database {
                database_url: config
                    .database_url
                    .clone()
                    .ok_or(IngestionError::MissingDatabaseUrl)?,
            }
        };

        Ok(ImportRequest { source, sink })
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    DryRun(ImportSummary),
    CsvWritten { path: PathBuf, rows: usize },
    CsvFailed { path: PathBuf, reason: String },
    Database(WriteStats),
}

/// Run `request` against the configured KLADR endpoint
pub async fn run(request: &ImportRequest, config: &Config) -> Result<ImportOutcome> {
    let directory = KladrClient::new(config.kladr_api_url.clone());
    run_with_directory(request, &directory).await
}

/// Run `request`, using `directory` for the KLADR source
pub async fn run_with_directory(
    request: &ImportRequest,
    directory: &dyn DirectoryApi,
) -> Result<ImportOutcome> {
    info!("=== Address import ===");

    info!("Step 1/3: Fetching addresses...");
    let records = fetch(&request.source, directory).await;
    if records.is_empty() {
        return Err(IngestionError::NoAddresses.into());
    }
    info!("✓ Fetched {} addresses", records.len());

    info!("Step 2/3: Processing addresses...");
    let processed = process_addresses(records);
    process::report(&processed);
    info!("✓ {} unique addresses", processed.records.len());

    info!("Step 3/3: Saving addresses...");
    let outcome = match &request.sink {
        Sink::DryRun => {
            let summary = ImportSummary::from_records(&processed.records);
            log_summary(&summary);
            ImportOutcome::DryRun(summary)
        }
        Sink::Csv { path } => match save_to_csv(path, &processed.records) {
            Ok(rows) => ImportOutcome::CsvWritten {
                path: path.clone(),
                rows,
            },
            Err(e) => {
                error!("Failed to save CSV: {:#}", e);
                ImportOutcome::CsvFailed {
                    path: path.clone(),
                    reason: format!("{:#}", e),
                }
            }
        },
        Sink::Database { database_url } => {
            let stats = save_to_database(database_url, &processed.records).await?;
            info!("✓ Write complete: {}", stats);
            ImportOutcome::Database(stats)
        }
    };

    Ok(outcome)
}

async fn fetch(source: &Source, directory: &dyn DirectoryApi) -> Vec<AddressRecord> {
    match source {
        Source::Kladr { city } => fetch_from_kladr(directory, city).await,
        Source::TwoGis { api_key, city } => fetch_from_2gis(api_key, city),
        Source::Csv { path } => read_csv_source(path),
    }
}

fn log_summary(summary: &ImportSummary) {
    info!("Statistics (--dry-run, nothing saved):");
    info!("  Total addresses: {}", summary.total);
    info!("  Unique streets: {}", summary.distinct_streets);
    info!("Sample addresses:");
    for record in &summary.sample {
        info!("  {}", record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::fetch::KladrQuery;
    use crate::ingestion::types::KladrObject;
    use async_trait::async_trait;
    use clap::Parser;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("address-import").chain(args.iter().copied())).unwrap()
    }

    fn config_with_db() -> Config {
        Config {
            database_url: Some("postgres://localhost/addresses".to_string()),
            ..Config::default()
        }
    }

    /// Directory that must not be called
    struct UnusedDirectory;

    #[async_trait]
    impl DirectoryApi for UnusedDirectory {
        async fn query(&self, query: &KladrQuery) -> Result<Vec<KladrObject>, IngestionError> {
            panic!("unexpected directory query: {:?}", query);
        }
    }

    /// One city, one street, two buildings
    struct SingleStreetDirectory;

    #[async_trait]
    impl DirectoryApi for SingleStreetDirectory {
        async fn query(&self, query: &KladrQuery) -> Result<Vec<KladrObject>, IngestionError> {
            let object = |id: &str, name: &str, type_short: &str| KladrObject {
                id: id.to_string(),
                name: name.to_string(),
                type_short: type_short.to_string(),
            };

            Ok(match query {
                KladrQuery::City { .. } => vec![object("7000000100000", "Томск", "г")],
                KladrQuery::Streets { offset: 0, .. } => vec![object("s1", "Ленина", "пр-кт")],
                KladrQuery::Streets { .. } => Vec::new(),
                KladrQuery::Buildings { .. } => vec![object("b2", "2", ""), object("b1", "10", "")],
            })
        }
    }

    fn write_csv(dir: &std::path::Path, content: &str) -> PathBuf {
        let path = dir.join("input.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_2gis_requires_api_key() {
        let err = ImportRequest::resolve(cli(&["--source", "2gis"]), &config_with_db()).unwrap_err();
        assert!(matches!(
            err,
            IngestionError::MissingArgument { flag: "api-key", .. }
        ));
    }

    #[test]
    fn test_csv_requires_file() {
        let err = ImportRequest::resolve(cli(&["--source", "csv", "--dry-run"]), &Config::default())
            .unwrap_err();
        assert!(matches!(err, IngestionError::MissingArgument { flag: "file", .. }));
    }

    #[test]
    fn test_database_sink_requires_url() {
        let err = ImportRequest::resolve(cli(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, IngestionError::MissingDatabaseUrl));
    }

    #[test]
    fn test_sink_precedence() {
        let request =
            ImportRequest::resolve(cli(&["--output", "out.csv", "--dry-run"]), &Config::default())
                .unwrap();
        assert_eq!(request.sink, Sink::DryRun);

        let request = ImportRequest::resolve(cli(&["--output", "out.csv"]), &Config::default()).unwrap();
        assert_eq!(
            request.sink,
            Sink::Csv {
                path: PathBuf::from("out.csv")
            }
        );

        let request = ImportRequest::resolve(cli(&["--city", "Seversk"]), &config_with_db()).unwrap();
        assert_eq!(
            request,
            ImportRequest {
                source: Source::Kladr {
                    city: "Seversk".to_string()
                },
                sink: Sink::Database {
                    database_url: "postgres://localhost/addresses".to_string()
                },
            }
        );
    }

    #[tokio::test]
    async fn test_dry_run_reports_processed_count() {
        let temp = tempdir().unwrap();
        let path = write_csv(
            temp.path(),
            "street,house,comment\nMira,2,\nLenina,10,\nMira,2,\nLenina,,\n",
        );
        let request = ImportRequest {
            source: Source::Csv { path },
            sink: Sink::DryRun,
        };

        let outcome = run_with_directory(&request, &UnusedDirectory).await.unwrap();

        match outcome {
            ImportOutcome::DryRun(summary) => {
                assert_eq!(summary.total, 2);
                assert_eq!(summary.distinct_streets, 2);
                assert_eq!(summary.sample[0], AddressRecord::new("Lenina", "10", None));
            }
            other => panic!("expected dry-run outcome, got {:?}", other),
        }
        // nothing but the input file was written
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_kladr_source_dry_run() {
        let request = ImportRequest {
            source: Source::Kladr {
                city: "Томск".to_string(),
            },
            sink: Sink::DryRun,
        };

        let outcome = run_with_directory(&request, &SingleStreetDirectory).await.unwrap();

        let ImportOutcome::DryRun(summary) = outcome else {
            panic!("expected dry-run outcome");
        };
        assert_eq!(
            summary.sample,
            vec![
                AddressRecord::new("пр-кт Ленина", "10", None),
                AddressRecord::new("пр-кт Ленина", "2", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_source_is_an_error() {
        let request = ImportRequest {
            source: Source::TwoGis {
                api_key: "key".to_string(),
                city: "Tomsk".to_string(),
            },
            sink: Sink::DryRun,
        };

        let err = run_with_directory(&request, &UnusedDirectory).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<IngestionError>(),
            Some(IngestionError::NoAddresses)
        ));
    }

    #[tokio::test]
    async fn test_csv_sink_writes_sorted_output() {
        let temp = tempdir().unwrap();
        let input = write_csv(temp.path(), "street,house,comment\nMira,2,\nLenina,5,gate\n");
        let output = temp.path().join("out.csv");
        let request = ImportRequest {
            source: Source::Csv { path: input },
            sink: Sink::Csv {
                path: output.clone(),
            },
        };

        let outcome = run_with_directory(&request, &UnusedDirectory).await.unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::CsvWritten {
                path: output.clone(),
                rows: 2
            }
        );
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "street,house,comment\nLenina,5,gate\nMira,2,\n"
        );
    }

    #[tokio::test]
    async fn test_csv_sink_failure_is_not_fatal() {
        let temp = tempdir().unwrap();
        let input = write_csv(temp.path(), "street,house,comment\nMira,2,\n");
        let output = temp.path().join("no-such-dir").join("out.csv");
        let request = ImportRequest {
            source: Source::Csv { path: input },
            sink: Sink::Csv {
                path: output.clone(),
            },
        };

        let outcome = run_with_directory(&request, &UnusedDirectory).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::CsvFailed { path, .. } if path == output));
    }
}
