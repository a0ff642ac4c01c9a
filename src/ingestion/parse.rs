//! Parse functions - transform CSV files into AddressRecord structs

use crate::ingestion::error::IngestionError;
use crate::ingestion::types::AddressRecord;
use crate::ingestion::utils::non_empty;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{error, info};

/// Address CSV row, columns matched by header name
#[derive(Debug, Deserialize)]
struct AddressCsvRow {
    #[serde(default)]
    street: Option<String>,

    #[serde(default)]
    house: Option<String>,

    #[serde(default)]
    comment: Option<String>,
}

/// Parse CSV rows into records. Rows without a street or house are skipped.
pub fn parse_address_csv<R: Read>(input: R) -> Result<Vec<AddressRecord>, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut records = Vec::new();

    for result in reader.deserialize::<AddressCsvRow>() {
        let row = result?;
        if let Some(record) = parse_row(row) {
            records.push(record);
        }
    }

    Ok(records)
}

fn parse_row(row: AddressCsvRow) -> Option<AddressRecord> {
    let street = non_empty(row.street.as_deref())?;
    let house = non_empty(row.house.as_deref())?;
    let comment = non_empty(row.comment.as_deref());

    Some(AddressRecord::new(street, house, comment))
}

/// CSV source. A missing or malformed file is logged and yields an empty list.
pub fn read_csv_source(path: &Path) -> Vec<AddressRecord> {
    info!("Loading addresses from {:?}", path);

    let result = File::open(path)
        .map_err(IngestionError::from)
        .and_then(parse_address_csv);

    match result {
        Ok(records) => {
            info!("✓ Loaded {} addresses from CSV", records.len());
            records
        }
        Err(IngestionError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("File {:?} not found", path);
            Vec::new()
        }
        Err(e) => {
            error!("Failed to read CSV {:?}: {}", path, e);
            Vec::new()
        }
    }
}
