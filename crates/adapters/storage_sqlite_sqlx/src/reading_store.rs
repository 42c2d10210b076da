//! `SQLite` implementation of [`ReadingStore`].

use sqlx::SqlitePool;

use manostat_app::error::AppError;
use manostat_app::ports::{ReadingStore, StoredReading};
use manostat_domain::reading::Reading;
use manostat_domain::time::format_wall;

use crate::error::StorageError;

const INSERT: &str = r"
    INSERT INTO pressure_readings (pressure, timestamp)
    VALUES (?, ?)
";

const SELECT_RECENT: &str = r"
    SELECT pressure, timestamp FROM pressure_readings
    ORDER BY timestamp DESC, id DESC
    LIMIT ?
";

/// Row shape for the history query, converted into the port type.
#[derive(sqlx::FromRow)]
struct ReadingRow {
    pressure: f64,
    timestamp: String,
}

/// `SQLite`-backed append-only reading log.
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingStore for SqliteReadingStore {
    async fn record(&self, reading: &Reading) -> Result<(), AppError> {
        sqlx::query(INSERT)
            .bind(reading.pressure_bar)
            .bind(format_wall(reading.at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<StoredReading>, AppError> {
        let rows: Vec<ReadingRow> = sqlx::query_as(SELECT_RECENT)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| StoredReading {
                pressure: row.pressure,
                timestamp: row.timestamp,
            })
            .collect())
    }
}
