//! Database access layer for polimoney-master
//!
//! [`MasterStore`] is the boundary between the district engine and the
//! datastore. [`SqliteMasterStore`] implements it over a `SqlitePool`
//! that is opened once in `main` and handed to the engine.

use crate::districts::District;
use crate::pagination::Page;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use polimoney_common::db::{
    max_rows_per_statement, upsert_last_updated, MunicipalityRow, DISTRICT_INSERT_COLUMNS,
};
use polimoney_common::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

mod tables;
pub use tables::{count_by_type, TypeCount};

/// Identifier that no generated district can have; the wipe excludes it
pub const RESERVED_DISTRICT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Datastore operations used by the fetcher and the reconciliation driver
#[async_trait]
pub trait MasterStore: Send + Sync {
    /// Read one page of active municipalities ordered by code
    async fn fetch_municipality_page(&self, page: Page) -> Result<Vec<MunicipalityRow>>;

    /// Delete every district row; returns the number of rows removed
    async fn delete_all_districts(&self) -> Result<u64>;

    /// Insert all given districts; either every row is written or none is
    async fn insert_districts(&self, districts: &[District]) -> Result<u64>;

    /// Upsert the freshness marker for `table_name`
    async fn upsert_freshness(&self, table_name: &str, at: DateTime<Utc>) -> Result<()>;

    /// Total number of rows in the districts table
    async fn count_districts(&self) -> Result<i64>;
}

/// SQLite-backed [`MasterStore`]
#[derive(Clone)]
pub struct SqliteMasterStore {
    pool: SqlitePool,
}

impl SqliteMasterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MasterStore for SqliteMasterStore {
    async fn fetch_municipality_page(&self, page: Page) -> Result<Vec<MunicipalityRow>> {
        let rows = sqlx::query_as::<_, MunicipalityRow>(
            r#"
            SELECT code, prefecture_name, city_name
            FROM municipalities
            WHERE is_active = 1
            ORDER BY code ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_all_districts(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM districts WHERE id <> ?")
            .bind(RESERVED_DISTRICT_ID)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_districts(&self, districts: &[District]) -> Result<u64> {
        if districts.is_empty() {
            return Ok(0);
        }

        // Large batches span several statements within one transaction
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in districts.chunks(max_rows_per_statement(DISTRICT_INSERT_COLUMNS)) {
            let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
                "INSERT INTO districts \
                 (id, name, type, prefecture_codes, municipality_code, description, is_active) ",
            );
            qb.push_values(chunk, |mut b, d| {
                b.push_bind(Uuid::new_v4().to_string())
                    .push_bind(&d.name)
                    .push_bind(d.district_type.code())
                    .push_bind(&d.prefecture_codes)
                    .push_bind(d.municipality_code.as_deref())
                    .push_bind(&d.description)
                    .push_bind(d.is_active);
            });

            inserted += qb.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn upsert_freshness(&self, table_name: &str, at: DateTime<Utc>) -> Result<()> {
        upsert_last_updated(&self.pool, table_name, at).await
    }

    async fn count_districts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM districts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
