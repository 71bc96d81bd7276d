//! Database models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Projection of an active `municipalities` row read by the district engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MunicipalityRow {
    pub code: String,
    pub prefecture_name: String,
    pub city_name: Option<String>,
}

/// Full `municipalities` record as written by the CSV importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMunicipality {
    pub code: String,
    pub prefecture_name: String,
    pub city_name: Option<String>,
    pub prefecture_name_kana: String,
    pub city_name_kana: Option<String>,
}

/// A `master_metadata` freshness marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MasterMetadata {
    pub table_name: String,
    pub last_updated_at: String,
}
