//! Municipality registry importer
//!
//! Loads the municipality code list (CSV with header:
//! `code, prefecture_name, city_name, prefecture_name_kana, city_name_kana`)
//! into the `municipalities` table. Existing codes are left untouched.
//!
//! Unlike the district driver this is all-or-abort: the first failed batch
//! stops the import with an error.

use crate::pagination::batches;
use chrono::Utc;
use polimoney_common::db::{
    max_rows_per_statement, upsert_last_updated, NewMunicipality, MUNICIPALITIES_TABLE,
    MUNICIPALITY_INSERT_COLUMNS,
};
use polimoney_common::{Error, Result};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Aggregate codes in the source list that are not municipalities
pub const RESERVED_CODES: [&str; 2] = ["999998", "999999"];

/// Parsed CSV contents
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub header: Option<String>,
    pub rows: Vec<NewMunicipality>,
    /// Lines with fewer than five fields
    pub skipped_malformed: usize,
    /// Lines carrying a reserved code
    pub skipped_reserved: usize,
}

/// Import result
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// Rows submitted for insert
    pub submitted: usize,
    /// Rows actually added (codes not already present)
    pub inserted: u64,
    pub skipped_malformed: usize,
    pub skipped_reserved: usize,
    /// Rows in `municipalities` after the import
    pub total: i64,
}

/// Split one CSV line into trimmed fields
///
/// Double quotes toggle quoting so that commas inside quotes are kept;
/// the quote characters themselves are dropped.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse the full CSV text; the first line is the header
pub fn parse_municipality_csv(text: &str) -> ParsedCsv {
    let mut lines = text.trim().lines();
    let mut parsed = ParsedCsv {
        header: lines.next().map(|h| h.trim().to_string()),
        ..ParsedCsv::default()
    };

    for line in lines {
        let fields = parse_csv_line(line);
        if fields.len() < 5 {
            parsed.skipped_malformed += 1;
            continue;
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let (code, prefecture_name, city_name, prefecture_name_kana, city_name_kana) =
            (next(), next(), next(), next(), next());

        if RESERVED_CODES.contains(&code.as_str()) {
            parsed.skipped_reserved += 1;
            continue;
        }

        parsed.rows.push(NewMunicipality {
            code,
            prefecture_name,
            city_name: non_empty(city_name),
            prefecture_name_kana,
            city_name_kana: non_empty(city_name_kana),
        });
    }

    parsed
}

/// Insert municipalities in batches, ignoring codes that already exist
///
/// Returns the number of new rows. Stops at the first failed batch.
pub async fn insert_municipalities(
    pool: &SqlitePool,
    rows: &[NewMunicipality],
    batch_size: usize,
) -> Result<u64> {
    let mut inserted = 0;
    let mut submitted = 0;

    for batch in batches(rows.len(), batch_size) {
        let chunk = &rows[batch.start..batch.end];
        let batch_error = |e: sqlx::Error| {
            Error::Internal(format!(
                "municipality batch {} (rows {}-{}) failed: {}",
                batch.index, batch.start, batch.end, e
            ))
        };

        let mut tx = pool.begin().await.map_err(batch_error)?;
        for statement_rows in chunk.chunks(max_rows_per_statement(MUNICIPALITY_INSERT_COLUMNS)) {
            let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
                "INSERT INTO municipalities \
                 (code, prefecture_name, city_name, prefecture_name_kana, city_name_kana) ",
            );
            qb.push_values(statement_rows, |mut b, m| {
                b.push_bind(&m.code)
                    .push_bind(&m.prefecture_name)
                    .push_bind(m.city_name.as_deref())
                    .push_bind(&m.prefecture_name_kana)
                    .push_bind(m.city_name_kana.as_deref());
            });
            qb.push(" ON CONFLICT(code) DO NOTHING");

            let result = qb.build().execute(&mut *tx).await.map_err(batch_error)?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(batch_error)?;

        submitted += chunk.len();
        info!("  ✓ {} / {} rows submitted", submitted, rows.len());
    }

    Ok(inserted)
}

/// Import a municipality CSV file
pub async fn import_municipalities(
    pool: &SqlitePool,
    csv_path: &Path,
    batch_size: usize,
) -> Result<ImportSummary> {
    info!("Reading municipality CSV: {}", csv_path.display());
    let text = std::fs::read_to_string(csv_path)?;

    let parsed = parse_municipality_csv(&text);
    match &parsed.header {
        Some(header) => info!("Header: {}", header),
        None => return Err(Error::InvalidInput(format!("{} is empty", csv_path.display()))),
    }
    if parsed.skipped_malformed > 0 {
        warn!("Skipped {} malformed lines", parsed.skipped_malformed);
    }
    info!(
        "Rows to insert: {} ({} reserved codes skipped)",
        parsed.rows.len(),
        parsed.skipped_reserved
    );

    let inserted = insert_municipalities(pool, &parsed.rows, batch_size).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM municipalities")
        .fetch_one(pool)
        .await?;

    upsert_last_updated(pool, MUNICIPALITIES_TABLE, Utc::now()).await?;
    info!("Municipality import complete: {} new, {} total", inserted, total);

    Ok(ImportSummary {
        submitted: parsed.rows.len(),
        inserted,
        skipped_malformed: parsed.skipped_malformed,
        skipped_reserved: parsed.skipped_reserved,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_quoted_comma() {
        let fields = parse_csv_line(r#"011002,北海道,"札幌市, 中央",ﾎｯｶｲﾄﾞｳ,ｻｯﾎﾟﾛｼ"#);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[2], "札幌市, 中央");
    }

    #[test]
    fn test_parse_line_trims_fields_and_crlf() {
        let fields = parse_csv_line(" 131016 , 東京都 ,千代田区,ﾄｳｷｮｳﾄ,ﾁﾖﾀﾞｸ\r");
        assert_eq!(fields, vec!["131016", "東京都", "千代田区", "ﾄｳｷｮｳﾄ", "ﾁﾖﾀﾞｸ"]);
    }

    #[test]
    fn test_parse_csv_skips_reserved_and_malformed() {
        let text = "\
団体コード,都道府県名,市区町村名,都道府県名カナ,市区町村名カナ
010006,北海道,,ﾎｯｶｲﾄﾞｳ,
011002,北海道,札幌市,ﾎｯｶｲﾄﾞｳ,ｻｯﾎﾟﾛｼ
999998,,,,
999999,全国,,ｾﾞﾝｺｸ,
broken,line
";
        let parsed = parse_municipality_csv(text);
        assert_eq!(parsed.header.as_deref(), Some("団体コード,都道府県名,市区町村名,都道府県名カナ,市区町村名カナ"));
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped_reserved, 2);
        assert_eq!(parsed.skipped_malformed, 1);

        assert_eq!(parsed.rows[0].code, "010006");
        assert!(parsed.rows[0].city_name.is_none());
        assert!(parsed.rows[0].city_name_kana.is_none());
        assert_eq!(parsed.rows[1].city_name.as_deref(), Some("札幌市"));
    }

    #[test]
    fn test_parse_header_only() {
        let parsed = parse_municipality_csv("code,prefecture_name,city_name,a,b\n");
        assert!(parsed.header.is_some());
        assert!(parsed.rows.is_empty());
    }
}
