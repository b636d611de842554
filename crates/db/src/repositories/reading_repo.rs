//! Repository for the `cement_data` table (append-mostly time series).

use std::sync::LazyLock;

use kilnwatch_core::reading::{CementReading, FEATURE_COUNT, FEATURE_NAMES};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Number of readings the dashboard looks back over.
pub const RECENT_LIMIT: i64 = 10;

/// Column list for `cement_data` queries, in feature order after `timestamp`.
static COLUMNS: LazyLock<String> =
    LazyLock::new(|| format!("timestamp, {}", FEATURE_NAMES.join(", ")));

static INSERT_SQL: LazyLock<String> = LazyLock::new(|| {
    let placeholders = vec!["?"; FEATURE_COUNT + 1].join(", ");
    format!(
        "INSERT INTO cement_data ({}) VALUES ({placeholders})",
        *COLUMNS
    )
});

/// Provides query operations for plant readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Insert a single reading.
    pub async fn insert(pool: &SqlitePool, reading: &CementReading) -> Result<(), sqlx::Error> {
        let mut query = sqlx::query(&INSERT_SQL).bind(reading.timestamp.clone());
        for value in reading.features() {
            query = query.bind(value);
        }
        query.execute(pool).await?;
        Ok(())
    }

    /// The newest `limit` readings, newest first.
    pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<CementReading>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM cement_data ORDER BY timestamp DESC LIMIT ?",
            *COLUMNS
        );
        let rows = sqlx::query(&query).bind(limit).fetch_all(pool).await?;
        rows.iter().map(reading_from_row).collect()
    }

    /// The newest reading, if any.
    pub async fn latest(pool: &SqlitePool) -> Result<Option<CementReading>, sqlx::Error> {
        Ok(Self::recent(pool, 1).await?.into_iter().next())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cement_data")
            .fetch_one(pool)
            .await
    }

    /// Delete every reading except the newest `keep`.
    ///
    /// Returns the number of rows deleted.
    pub async fn prune_keep_latest(pool: &SqlitePool, keep: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cement_data WHERE rowid NOT IN \
             (SELECT rowid FROM cement_data ORDER BY timestamp DESC LIMIT ?)",
        )
        .bind(keep)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Decode a row selected with [`COLUMNS`]. SQL `NULL` features become NaN,
/// which downstream treats as absent.
fn reading_from_row(row: &SqliteRow) -> Result<CementReading, sqlx::Error> {
    let timestamp: Option<String> = row.try_get("timestamp")?;
    let mut values = [f64::NAN; FEATURE_COUNT];
    for (value, name) in values.iter_mut().zip(FEATURE_NAMES) {
        if let Some(v) = row.try_get::<Option<f64>, _>(name)? {
            *value = v;
        }
    }
    Ok(CementReading::from_features(
        timestamp.unwrap_or_default(),
        values,
    ))
}
