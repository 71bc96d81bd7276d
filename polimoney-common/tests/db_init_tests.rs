//! Tests for database initialization
//!
//! - Database file is created on first run
//! - Re-opening an existing database is idempotent
//! - Master-data tables exist with the expected constraints

use polimoney_common::db::init::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("polimoney.db");

    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("polimoney.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO municipalities (code, prefecture_name) VALUES ('130001', '東京都')")
        .execute(&pool1)
        .await
        .unwrap();
    drop(pool1);

    // Second open must not drop or recreate existing tables
    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM municipalities")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_master_tables_created() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("polimoney.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in ["districts", "master_metadata", "municipalities"] {
        assert!(
            tables.iter().any(|t| t == expected),
            "missing table {expected}, found {tables:?}"
        );
    }
}

#[tokio::test]
async fn test_district_type_constraint() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("polimoney.db")).await.unwrap();

    let ok = sqlx::query("INSERT INTO districts (id, name, type) VALUES ('a', '北海道知事選挙区', 'PG')")
        .execute(&pool)
        .await;
    assert!(ok.is_ok());

    let bad = sqlx::query("INSERT INTO districts (id, name, type) VALUES ('b', 'x', 'XX')")
        .execute(&pool)
        .await;
    assert!(bad.is_err(), "unknown district type should be rejected");
}

#[tokio::test]
async fn test_municipality_defaults_active() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("polimoney.db")).await.unwrap();

    sqlx::query(
        "INSERT INTO municipalities (code, prefecture_name, city_name) \
         VALUES ('131016', '東京都', '千代田区')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let active: i64 =
        sqlx::query_scalar("SELECT is_active FROM municipalities WHERE code = '131016'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active, 1);
}
