//! Write functions - persist addresses to PostgreSQL or a CSV file

use crate::ingestion::types::{AddressRecord, WriteStats};
use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
use std::path::Path;
use tracing::info;

/// Rows per INSERT statement
pub const INSERT_BATCH_SIZE: usize = 100;

/// Target table, unique on `(street, house)`
pub const ADDRESS_TABLE: &str = "zakaz_addresses";

/// Header written by the CSV sink
pub const CSV_HEADER: [&str; 3] = ["street", "house", "comment"];

/// Connect to `database_url`, insert `records` and close the connection.
pub async fn save_to_database(database_url: &str, records: &[AddressRecord]) -> Result<WriteStats> {
    info!("Saving {} addresses to the database", records.len());

    let mut conn = PgConnection::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    let stats = write_addresses(&mut conn, records).await?;

    conn.close().await.context("Failed to close database connection")?;

    info!("✓ Added {} new addresses", stats.inserted);
    info!("Total addresses in database: {}", stats.table_total);

    Ok(stats)
}

/// Insert `records` in batches inside one transaction.
///
/// Rows whose `(street, house)` already exists are left untouched.
pub async fn write_addresses(conn: &mut PgConnection, records: &[AddressRecord]) -> Result<WriteStats> {
    let mut stats = WriteStats {
        submitted: records.len(),
        ..WriteStats::default()
    };

    let mut tx = conn.begin().await.context("Failed to start transaction")?;

    for batch in records.chunks(INSERT_BATCH_SIZE) {
        let mut query = insert_batch_query(batch);
        let result = query
            .build()
            .execute(&mut *tx)
            .await
            .context("Failed to insert address batch")?;

        stats.inserted += result.rows_affected() as usize;
        info!("  Inserted: {}/{}", stats.inserted, stats.submitted);
    }

    tx.commit().await.context("Failed to commit addresses")?;

    stats.skipped = stats.submitted - stats.inserted;
    stats.table_total = count_addresses(conn).await?;

    Ok(stats)
}

fn insert_batch_query(batch: &[AddressRecord]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} (street, house, comment) ",
        ADDRESS_TABLE
    ));

    builder.push_values(batch, |mut row, record| {
        row.push_bind(record.street())
            .push_bind(record.house())
            .push_bind(record.comment());
    });
    builder.push(" ON CONFLICT (street, house) DO NOTHING");

    builder
}

/// Row count of the address table
pub async fn count_addresses(conn: &mut PgConnection) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", ADDRESS_TABLE);
    let total = sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(conn)
        .await
        .context("Failed to count addresses")?;

    Ok(total)
}

/// Write `records` to `path`, replacing any existing file.
pub fn save_to_csv(path: &Path, records: &[AddressRecord]) -> Result<usize> {
    info!("Saving {} addresses to {:?}", records.len(), path);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.street(),
            record.house(),
            record.comment().unwrap_or(""),
        ])?;
    }
    writer.flush()?;

    info!("✓ Data saved to {:?}", path);

    Ok(records.len())
}
