//! Master-data status: freshness markers and row counts

use crate::db::{count_by_type, TypeCount};
use polimoney_common::db::{get_last_updated, DISTRICTS_TABLE, MUNICIPALITIES_TABLE};
use polimoney_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize)]
pub struct MasterStatus {
    pub districts_updated_at: Option<String>,
    pub municipalities_updated_at: Option<String>,
    pub district_counts: Vec<TypeCount>,
    pub active_municipalities: i64,
}

impl MasterStatus {
    pub fn district_total(&self) -> i64 {
        self.district_counts.iter().map(|c| c.row_count).sum()
    }
}

/// Read freshness markers and current counts
pub async fn load_status(pool: &SqlitePool) -> Result<MasterStatus> {
    let districts_updated_at = get_last_updated(pool, DISTRICTS_TABLE)
        .await?
        .map(|m| m.last_updated_at);
    let municipalities_updated_at = get_last_updated(pool, MUNICIPALITIES_TABLE)
        .await?
        .map(|m| m.last_updated_at);

    let district_counts = count_by_type(pool).await?;

    let active_municipalities: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM municipalities WHERE is_active = 1")
            .fetch_one(pool)
            .await?;

    Ok(MasterStatus {
        districts_updated_at,
        municipalities_updated_at,
        district_counts,
        active_municipalities,
    })
}
