use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing::instrument;

use crate::model::{LatestReading, Reading};

pub mod read;
pub mod write;
mod tables;

/// Amount of readings served by the history endpoints.
pub const HISTORY_LIMIT: usize = 10;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

//WAL lets the dashboard read while a device is reporting
fn configure_connection(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

/// Query layer shared by the JSON api and the html pages.
///
/// Every operation checks a connection out of the pool, runs its statements on the
/// blocking thread pool and hands the connection back when it finishes, whatever the outcome.
#[derive(Clone)]
pub struct ReadingStore {
    db: Arc<DbPool>,
}

impl ReadingStore {
    pub fn open(path: impl AsRef<Path>, pool_size: u32) -> Result<Self> {
        let db = Self::build_db(path.as_ref(), pool_size)?;

        Ok(ReadingStore { db: Arc::new(db) })
    }

    #[instrument]
    fn build_db(path: &Path, pool_size: u32) -> Result<DbPool> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(configure_connection);

        let db_pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .with_context(|| format!("Couldn't open database {}", path.display()))?;

        let conn = db_pool.get()?;

        conn.execute(tables::SENSORS_TABLE, [])?;
        debug!("Built sensors table");

        conn.execute(tables::SENSORS_INDEX, [])?;
        debug!("Built sensors index");

        Ok(db_pool)
    }

    async fn with_conn<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbConnection) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || {
            let conn = db.get().context("Couldn't get a database connection")?;
            operation(&conn)
        })
        .await?
    }

    #[instrument(skip(self))]
    pub async fn insert_reading(&self, sensor_id: i64, value: f64) -> Result<()> {
        self.with_conn(move |conn| write::insert_reading(conn, sensor_id, value))
            .await
    }

    pub async fn latest_reading(&self, sensor_id: i64) -> Result<Option<Reading>> {
        self.with_conn(move |conn| read::get_latest_reading(conn, sensor_id))
            .await
    }

    pub async fn reading_count(&self, sensor_id: i64) -> Result<u64> {
        self.with_conn(move |conn| read::get_reading_count(conn, sensor_id))
            .await
    }

    /// Latest reading plus the reading count, both read through the same connection.
    pub async fn latest_summary(&self, sensor_id: i64) -> Result<Option<LatestReading>> {
        self.with_conn(move |conn| {
            let Some(latest) = read::get_latest_reading(conn, sensor_id)? else {
                return Ok(None);
            };
            let total = read::get_reading_count(conn, sensor_id)?;

            Ok(Some(LatestReading::new(sensor_id, latest, total)))
        })
        .await
    }

    pub async fn history(&self, sensor_id: i64, limit: usize) -> Result<Vec<Reading>> {
        self.with_conn(move |conn| read::get_history(conn, sensor_id, limit))
            .await
    }

    pub async fn list_device_ids(&self) -> Result<Vec<i64>> {
        self.with_conn(read::get_device_ids).await
    }

    pub async fn database_time(&self) -> Result<String> {
        self.with_conn(read::get_database_time).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, ReadingStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("sensors.db3"), 4).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn latest_returns_inserted_value() {
        let (_dir, store) = open_store();
        let before = Utc::now().naive_utc().with_nanosecond(0).unwrap();

        store.insert_reading(3, 18.25).await.unwrap();

        let latest = store.latest_reading(3).await.unwrap().unwrap();
        assert_eq!(latest.value, 18.25);
        assert!(latest.timestamp >= before);
    }

    #[tokio::test]
    async fn latest_on_unknown_device_is_none() {
        let (_dir, store) = open_store();
        store.insert_reading(1, 1.0).await.unwrap();

        assert_eq!(store.latest_reading(2).await.unwrap(), None);
        assert_eq!(store.latest_summary(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn count_tracks_inserts_per_device() {
        let (_dir, store) = open_store();
        assert_eq!(store.reading_count(5).await.unwrap(), 0);

        for value in [1.0, 2.0, 3.0] {
            store.insert_reading(5, value).await.unwrap();
        }
        store.insert_reading(6, 9.0).await.unwrap();

        assert_eq!(store.reading_count(5).await.unwrap(), 3);
        assert_eq!(store.reading_count(6).await.unwrap(), 1);

        let summary = store.latest_summary(5).await.unwrap().unwrap();
        assert_eq!(summary.latest_value, 3.0);
        assert_eq!(summary.total_readings, 3);
    }

    #[tokio::test]
    async fn history_keeps_the_most_recent_readings_oldest_first() {
        let (_dir, store) = open_store();
        for i in 0..15 {
            store.insert_reading(9, i as f64).await.unwrap();
        }

        let history = store.history(9, HISTORY_LIMIT).await.unwrap();

        let values: Vec<f64> = history.iter().map(|r| r.value).collect();
        assert_eq!(values, (5..15).map(|i| i as f64).collect::<Vec<_>>());
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn history_of_unknown_device_is_empty() {
        let (_dir, store) = open_store();

        assert!(store.history(42, HISTORY_LIMIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn device_ids_are_distinct_and_sorted() {
        let (_dir, store) = open_store();
        for id in [12, 3, 12, 7, 3] {
            store.insert_reading(id, 0.5).await.unwrap();
        }

        assert_eq!(store.list_device_ids().await.unwrap(), vec![3, 7, 12]);
    }

    #[tokio::test]
    async fn database_time_is_readable() {
        let (_dir, store) = open_store();

        let now = store.database_time().await.unwrap();
        assert_eq!(now.len(), "YYYY-MM-DD HH:MM:SS".len());
    }
}
