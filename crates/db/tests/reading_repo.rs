//! Integration tests for the `cement_data` repository against in-memory SQLite.

use kilnwatch_core::reading::{CementReading, FEATURE_COUNT, FEATURE_NAMES};
use kilnwatch_db::repositories::reading_repo::RECENT_LIMIT;
use kilnwatch_db::repositories::ReadingRepo;
use kilnwatch_db::DbPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn test_pool() -> DbPool {
    let pool = kilnwatch_db::create_pool("sqlite::memory:").await.unwrap();
    kilnwatch_db::run_migrations(&pool).await.unwrap();
    pool
}

fn reading_at(timestamp: &str, total_cement_produced: f64) -> CementReading {
    let mut values: [f64; FEATURE_COUNT] = std::array::from_fn(|i| i as f64 + 0.5);
    values[0] = total_cement_produced;
    CementReading::from_features(timestamp, values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bootstrap_and_health_check() {
    let pool = test_pool().await;
    kilnwatch_db::health_check(&pool).await.unwrap();
    assert_eq!(ReadingRepo::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let pool = test_pool().await;
    kilnwatch_db::run_migrations(&pool).await.unwrap();
}

#[tokio::test]
async fn empty_table_has_no_latest() {
    let pool = test_pool().await;
    assert!(ReadingRepo::latest(&pool).await.unwrap().is_none());
    assert!(ReadingRepo::recent(&pool, RECENT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_round_trips_every_column() {
    let pool = test_pool().await;
    let reading = reading_at("2024-05-01 10:00:00.000001", 1.235);

    ReadingRepo::insert(&pool, &reading).await.unwrap();

    let stored = ReadingRepo::latest(&pool).await.unwrap().unwrap();
    assert_eq!(stored, reading);
}

#[tokio::test]
async fn recent_is_newest_first_and_limited() {
    let pool = test_pool().await;
    // Inserted out of order on purpose.
    for (second, total) in [(3, 0.3), (1, 0.1), (12, 1.2), (7, 0.7)] {
        let ts = format!("2024-05-01 10:00:{second:02}.000000");
        ReadingRepo::insert(&pool, &reading_at(&ts, total)).await.unwrap();
    }

    let recent = ReadingRepo::recent(&pool, 3).await.unwrap();
    let totals: Vec<f64> = recent.iter().map(|r| r.total_cement_produced).collect();
    assert_eq!(totals, vec![1.2, 0.7, 0.3]);

    let latest = ReadingRepo::latest(&pool).await.unwrap().unwrap();
    assert_eq!(latest.timestamp, "2024-05-01 10:00:12.000000");
}

#[tokio::test]
async fn null_columns_decode_as_nan() {
    let pool = test_pool().await;
    sqlx::query("INSERT INTO cement_data (timestamp, kiln_temperature) VALUES (?, ?)")
        .bind("2024-05-01 10:00:00.000000")
        .bind(1210.0)
        .execute(&pool)
        .await
        .unwrap();

    let stored = ReadingRepo::latest(&pool).await.unwrap().unwrap();
    assert_eq!(stored.kiln_temperature, 1210.0);
    assert!(stored.oee.is_nan());
    assert_eq!(stored.field("oee"), None);
}

#[tokio::test]
async fn prune_keeps_only_newest_rows() {
    let pool = test_pool().await;
    for second in 0..15 {
        let ts = format!("2024-05-01 10:00:{second:02}.000000");
        ReadingRepo::insert(&pool, &reading_at(&ts, f64::from(second)))
            .await
            .unwrap();
    }

    let deleted = ReadingRepo::prune_keep_latest(&pool, RECENT_LIMIT).await.unwrap();
    assert_eq!(deleted, 5);
    assert_eq!(ReadingRepo::count(&pool).await.unwrap(), RECENT_LIMIT);

    let oldest_kept = ReadingRepo::recent(&pool, 100).await.unwrap().pop().unwrap();
    assert_eq!(oldest_kept.total_cement_produced, 5.0);

    let again = ReadingRepo::prune_keep_latest(&pool, RECENT_LIMIT).await.unwrap();
    assert_eq!(again, 0);
}

#[tokio::test]
async fn schema_has_one_column_per_feature() {
    let pool = test_pool().await;
    let columns: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('cement_data') ORDER BY cid")
            .fetch_all(&pool)
            .await
            .unwrap();

    assert_eq!(columns.len(), FEATURE_COUNT + 1);
    assert_eq!(columns[0], "timestamp");
    assert_eq!(&columns[1..], FEATURE_NAMES.as_slice());
}
