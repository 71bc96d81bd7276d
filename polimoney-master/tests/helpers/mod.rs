//! Shared test fixtures for polimoney-master integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use polimoney_common::config::MasterSettings;
use polimoney_common::db::{init_database, MunicipalityRow};
use polimoney_common::{Error, Result};
use polimoney_master::pagination::Page;
use polimoney_master::{District, MasterStore, SqliteMasterStore};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Districts produced from the compiled reference tables alone
/// (HR 289 + HC 45 + PG 47 + PA 47)
pub const PREFECTURE_LEVEL_TOTAL: usize = 289 + 45 + 47 + 47;

/// Open a fresh database in a temp dir; keep the TempDir alive for the test
pub async fn setup_store() -> (TempDir, SqliteMasterStore) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("polimoney.db"))
        .await
        .expect("Should initialize database");
    (dir, SqliteMasterStore::new(pool))
}

pub fn settings(page_size: usize, batch_size: usize) -> MasterSettings {
    MasterSettings {
        page_size,
        batch_size,
    }
}

/// Insert `count` active Tokyo municipalities with codes 130001..
pub async fn seed_municipalities(pool: &SqlitePool, count: usize) {
    sqlx::query(
        r#"
        WITH RECURSIVE seq(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM seq WHERE i < ?)
        INSERT INTO municipalities (code, prefecture_name, city_name)
        SELECT printf('13%04d', i), '東京都', 'テスト市' || i FROM seq WHERE i <= ?
        "#,
    )
    .bind(count as i64)
    .bind(count as i64)
    .execute(pool)
    .await
    .expect("Should insert municipalities");
}

/// Comparable snapshot of the districts table (ids and timestamps excluded)
pub type DistrictSnapshotRow = (String, String, String, Option<String>, String, bool);

pub async fn district_snapshot(pool: &SqlitePool) -> Vec<DistrictSnapshotRow> {
    sqlx::query_as(
        r#"
        SELECT name, type, prefecture_codes, municipality_code, description, is_active
        FROM districts
        ORDER BY type, prefecture_codes, municipality_code, name
        "#,
    )
    .fetch_all(pool)
    .await
    .expect("Should read districts")
}

pub async fn count_of_type(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM districts WHERE type = ?")
        .bind(code)
        .fetch_one(pool)
        .await
        .expect("Should count districts")
}

fn injected(what: &str) -> Error {
    Error::Internal(format!("injected failure: {}", what))
}

/// [`MasterStore`] wrapper that fails selected operations
#[derive(Default)]
pub struct FlakyStore {
    pub inner: Option<SqliteMasterStore>,
    pub fail_delete: bool,
    /// Page offsets whose read fails
    pub fail_page_offsets: HashSet<usize>,
    /// 1-based insert call numbers that fail
    pub fail_insert_calls: HashSet<usize>,
    pub fail_freshness: bool,
    pub fail_count: bool,
    pub insert_calls: AtomicUsize,
    pub page_reads: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: SqliteMasterStore) -> Self {
        Self {
            inner: Some(inner),
            ..Self::default()
        }
    }

    pub fn page_reads(&self) -> usize {
        self.page_reads.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn inner(&self) -> &SqliteMasterStore {
        self.inner.as_ref().expect("FlakyStore needs an inner store")
    }
}

#[async_trait]
impl MasterStore for FlakyStore {
    async fn fetch_municipality_page(&self, page: Page) -> Result<Vec<MunicipalityRow>> {
        self.page_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_page_offsets.contains(&page.offset) {
            return Err(injected("page read"));
        }
        self.inner().fetch_municipality_page(page).await
    }

    async fn delete_all_districts(&self) -> Result<u64> {
        if self.fail_delete {
            return Err(injected("delete"));
        }
        self.inner().delete_all_districts().await
    }

    async fn insert_districts(&self, districts: &[District]) -> Result<u64> {
        let call = self.insert_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_insert_calls.contains(&call) {
            return Err(injected("insert"));
        }
        self.inner().insert_districts(districts).await
    }

    async fn upsert_freshness(&self, table_name: &str, at: DateTime<Utc>) -> Result<()> {
        if self.fail_freshness {
            return Err(injected("freshness"));
        }
        self.inner().upsert_freshness(table_name, at).await
    }

    async fn count_districts(&self) -> Result<i64> {
        if self.fail_count {
            return Err(injected("count"));
        }
        self.inner().count_districts().await
    }
}
