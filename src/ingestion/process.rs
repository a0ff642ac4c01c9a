//! Post-processing: exact dedup and ordinal sort

use crate::ingestion::types::AddressRecord;
use std::collections::HashSet;
use tracing::{info, warn};

/// Output of [`process_addresses`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAddresses {
    pub records: Vec<AddressRecord>,
    pub duplicates_removed: usize,
    /// Survivors sharing `(street, house)` with an earlier survivor
    pub key_collisions: usize,
}

/// Drop exact duplicate triples (first occurrence wins), then stable-sort
/// by `(street, house)` using plain string ordering.
pub fn process_addresses(records: Vec<AddressRecord>) -> ProcessedAddresses {
    let input_len = records.len();

    let mut seen = HashSet::with_capacity(input_len);
    let mut unique: Vec<AddressRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect();

    let duplicates_removed = input_len - unique.len();

    unique.sort_by(|a, b| a.key().cmp(&b.key()));

    let key_collisions = unique
        .windows(2)
        .filter(|w| w[0].key() == w[1].key())
        .count();

    ProcessedAddresses {
        records: unique,
        duplicates_removed,
        key_collisions,
    }
}

/// Log the processing outcome
pub fn report(processed: &ProcessedAddresses) {
    if processed.duplicates_removed > 0 {
        info!("Removed {} duplicates", processed.duplicates_removed);
    }

    if processed.key_collisions > 0 {
        warn!(
            "{} addresses share street and house with another record and differ only in comment; \
             the database keeps the first of each",
            processed.key_collisions
        );
    }
}
