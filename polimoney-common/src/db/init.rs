//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures the master-data
//! tables exist. Safe to call repeatedly against the same file.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Bound parameters allowed in one statement (SQLite's SQLITE_MAX_VARIABLE_NUMBER)
pub const SQLITE_MAX_VARIABLES: usize = 32766;

/// Columns bound per row by the district insert
pub const DISTRICT_INSERT_COLUMNS: usize = 7;

/// Columns bound per row by the municipality insert
pub const MUNICIPALITY_INSERT_COLUMNS: usize = 5;

/// Rows that fit in one multi-row INSERT binding `columns` values each
pub const fn max_rows_per_statement(columns: usize) -> usize {
    if columns == 0 || columns > SQLITE_MAX_VARIABLES {
        return 1;
    }
    SQLITE_MAX_VARIABLES / columns
}

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    // Runs are sequential; a small pool is plenty.
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Idempotent - safe to call multiple times
    create_municipalities_table(&pool).await?;
    create_districts_table(&pool).await?;
    create_master_metadata_table(&pool).await?;

    Ok(pool)
}

/// Create the municipalities table
///
/// Populated by the municipality CSV importer, read by the district engine.
async fn create_municipalities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS municipalities (
            code TEXT PRIMARY KEY,
            prefecture_name TEXT NOT NULL,
            city_name TEXT,
            prefecture_name_kana TEXT,
            city_name_kana TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_municipalities_active ON municipalities(is_active, code)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the districts table
async fn create_districts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS districts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('HR', 'HC', 'PG', 'PA', 'GM', 'CM')),
            prefecture_codes TEXT,
            municipality_code TEXT,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_districts_type ON districts(type)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_districts_municipality ON districts(municipality_code)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the master_metadata table (one freshness marker per table)
async fn create_master_metadata_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS master_metadata (
            table_name TEXT PRIMARY KEY,
            last_updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
