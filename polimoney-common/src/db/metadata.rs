//! Freshness markers
//!
//! `master_metadata` holds one row per master table recording when that
//! table was last rebuilt. Writes are upserts keyed by `table_name`.

use super::models::MasterMetadata;
use crate::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

/// Table name key for the districts marker
pub const DISTRICTS_TABLE: &str = "districts";

/// Table name key for the municipalities marker
pub const MUNICIPALITIES_TABLE: &str = "municipalities";

/// Insert or update the freshness marker for `table_name`
pub async fn upsert_last_updated(
    pool: &SqlitePool,
    table_name: &str,
    at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO master_metadata (table_name, last_updated_at)
        VALUES (?, ?)
        ON CONFLICT(table_name) DO UPDATE SET
            last_updated_at = excluded.last_updated_at
        "#,
    )
    .bind(table_name)
    .bind(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the freshness marker for `table_name`
///
/// Returns None if the table has never been rebuilt.
pub async fn get_last_updated(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Option<MasterMetadata>> {
    let marker = sqlx::query_as::<_, MasterMetadata>(
        "SELECT table_name, last_updated_at FROM master_metadata WHERE table_name = ?",
    )
    .bind(table_name)
    .fetch_optional(pool)
    .await?;

    Ok(marker)
}
