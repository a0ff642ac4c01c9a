//! Core data types for the import pipeline
//! Pure data structures with no I/O

use serde::Deserialize;
use std::collections::HashSet;

/// Street/house/comment triple moved through the pipeline.
///
/// Fields are private: a record is never modified after a source adapter
/// builds it. Equality and hashing cover the whole triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressRecord {
    street: String,
    house: String,
    comment: Option<String>,
}

impl AddressRecord {
    pub fn new(
        street: impl Into<String>,
        house: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            street: street.into(),
            house: house.into(),
            comment,
        }
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn house(&self) -> &str {
        &self.house
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Storage identity: the `(street, house)` pair
    pub fn key(&self) -> (&str, &str) {
        (&self.street, &self.house)
    }
}

impl std::fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.street, self.house)
    }
}

/// Envelope returned by every KLADR `api.php` call
#[derive(Debug, Deserialize)]
pub struct KladrResponse {
    #[serde(default)]
    pub result: Option<Vec<KladrObject>>,
}

impl KladrResponse {
    pub fn into_objects(self) -> Vec<KladrObject> {
        self.result.unwrap_or_default()
    }
}

/// City, street or building entry from KLADR
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KladrObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_short: String,
}

/// Database write statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub submitted: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub table_total: i64,
}

impl std::fmt::Display for WriteStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "submitted: {}, inserted: {}, skipped: {}, rows in table: {}",
            self.submitted, self.inserted, self.skipped, self.table_total
        )
    }
}

/// Number of records shown in a dry-run summary
pub const SUMMARY_SAMPLE_SIZE: usize = 10;

/// Dry-run statistics over a processed address list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub distinct_streets: usize,
    pub sample: Vec<AddressRecord>,
}

impl ImportSummary {
    pub fn from_records(records: &[AddressRecord]) -> Self {
        let distinct_streets = records
            .iter()
            .map(AddressRecord::street)
            .collect::<HashSet<_>>()
            .len();

        Self {
            total: records.len(),
            distinct_streets,
            sample: records.iter().take(SUMMARY_SAMPLE_SIZE).cloned().collect(),
        }
    }
}
