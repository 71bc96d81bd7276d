//! District count queries

use crate::districts::DistrictType;
use polimoney_common::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Row count for one district type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    /// Stored type code ("HR", "HC", ...)
    pub district_type: String,
    pub row_count: i64,
}

impl TypeCount {
    /// Display label such as "Governor (PG)"; unknown codes are shown raw
    pub fn label(&self) -> String {
        match DistrictType::from_code(&self.district_type) {
            Some(district_type) => district_type.to_string(),
            None => self.district_type.clone(),
        }
    }
}

/// Count districts grouped by type, ordered by type code
pub async fn count_by_type(pool: &SqlitePool) -> Result<Vec<TypeCount>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT type, COUNT(*)
        FROM districts
        GROUP BY type
        ORDER BY type ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(district_type, row_count)| TypeCount {
            district_type,
            row_count,
        })
        .collect())
}
