//! SQLite-backed image cache storage
//!
//! All reads and writes go through a pool capped at a single connection,
//! which is the store's serialized execution context: read-modify-write
//! races between concurrent saves for the same URL cannot interleave.

use crate::error::{Result, StorageError};
use crate::storage::ImageCacheStorage;
use crate::types::CacheEntry;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

/// File name of the store under the platform data directory.
const STORE_FILE_NAME: &str = "image-cache.sqlite";

/// Upper bound on rows removed per DELETE statement during a sweep.
const SWEEP_BATCH: i64 = 512;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS image_cache (
    url        TEXT PRIMARY KEY,
    image_data BLOB NOT NULL,
    timestamp  TEXT NOT NULL
)
"#;

/// Image cache storage backed by a local SQLite file
pub struct SqliteImageCacheStorage {
    pool: SqlitePool,
}

impl SqliteImageCacheStorage {
    /// Open (creating if missing) the store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        Self::connect(options).await
    }

    /// Open the store at its default location: `image-cache.sqlite` under
    /// the platform's local data directory.
    pub async fn open_default() -> Result<Self> {
        let dir = dirs::data_local_dir().ok_or_else(|| {
            StorageError::StorePath("platform data directory is unavailable".to_string())
        })?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::StorePath(format!("{}: {}", dir.display(), e)))?;
        Self::open(dir.join(STORE_FILE_NAME)).await
    }

    /// Open a private in-memory store. Contents live as long as the value.
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(SqliteConnectOptions::new().in_memory(true)).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        // One connection, held for the life of the pool. Dropping to zero
        // connections would discard an in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Fetch the full record for `url`, if any.
    pub async fn entry(&self, url: &str) -> Result<Option<CacheEntry>> {
        let entry = sqlx::query_as::<_, CacheEntry>(
            "SELECT url, image_data, timestamp FROM image_cache WHERE url = ?1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Insert or overwrite an entry with an explicit timestamp. Used to
    /// seed or backfill a store; normal saves always stamp the current
    /// time.
    pub async fn insert_with_timestamp(
        &self,
        url: &str,
        image_data: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO image_cache (url, image_data, timestamp)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(url) DO UPDATE SET
                image_data = excluded.image_data,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(url)
        .bind(image_data)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ImageCacheStorage for SqliteImageCacheStorage {
    async fn load_image(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT image_data FROM image_cache WHERE url = ?1")
                .bind(url)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.0))
    }

    async fn save_image(&self, url: &str, image_data: &[u8]) -> Result<()> {
        if image_data.is_empty() {
            return Ok(());
        }
        self.insert_with_timestamp(url, image_data, Utc::now()).await
    }

    async fn delete_older_than(&self, max_age: Duration) -> Result<u64> {
        let cutoff = Utc::now() - max_age;
        let mut deleted = 0u64;

        // Sweep in bounded batches so one save never pays for an unbounded
        // table scan.
        loop {
            let result = sqlx::query(
                r#"
                DELETE FROM image_cache WHERE rowid IN (
                    SELECT rowid FROM image_cache WHERE timestamp < ?1 LIMIT ?2
                )
                "#,
            )
            .bind(cutoff)
            .bind(SWEEP_BATCH)
            .execute(&self.pool)
            .await?;

            deleted += result.rows_affected();
            if result.rows_affected() < SWEEP_BATCH as u64 {
                break;
            }
        }

        if deleted > 0 {
            debug!(deleted, cutoff = %cutoff, "Deleted expired cache entries");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn row_count(store: &SqliteImageCacheStorage) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM image_cache")
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();

        store
            .save_image("https://example.com/a.png", &[1, 2, 3, 4, 5])
            .await
            .unwrap();

        let loaded = store.load_image("https://example.com/a.png").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3, 4, 5]));
    }

    #[tokio::test]
    async fn test_load_missing_url_is_none() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();

        let loaded = store.load_image("https://example.com/missing").await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_save_twice_keeps_one_entry_with_latest_bytes() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();
        let url = "https://example.com/a.png";

        store.save_image(url, &[1, 2, 3]).await.unwrap();
        let first = store.entry(url).await.unwrap().unwrap();

        store.save_image(url, &[9, 9]).await.unwrap();
        let second = store.entry(url).await.unwrap().unwrap();

        assert_eq!(row_count(&store).await, 1);
        assert_eq!(second.image_data, vec![9, 9]);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_save_stamps_current_time() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();

        let before = Utc::now();
        store.save_image("https://example.com/a.png", &[1]).await.unwrap();
        let after = Utc::now();

        let entry = store.entry("https://example.com/a.png").await.unwrap().unwrap();
        assert!(entry.timestamp >= before - Duration::seconds(1));
        assert!(entry.timestamp <= after + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_save_empty_bytes_is_noop() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();

        store.save_image("https://example.com/a.png", &[]).await.unwrap();

        assert_eq!(row_count(&store).await, 0);
        assert_eq!(
            store.load_image("https://example.com/a.png").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_delete_older_than_removes_only_expired() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();

        store
            .insert_with_timestamp(
                "https://example.com/old.png",
                &[1, 2, 3, 4, 5],
                Utc::now() - Duration::days(10),
            )
            .await
            .unwrap();
        store
            .save_image("https://example.com/fresh.png", &[7, 8, 9])
            .await
            .unwrap();

        let deleted = store.delete_older_than(Duration::days(7)).await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(store.load_image("https://example.com/old.png").await.unwrap(), None);
        assert_eq!(
            store.load_image("https://example.com/fresh.png").await.unwrap(),
            Some(vec![7, 8, 9])
        );
    }

    #[tokio::test]
    async fn test_delete_older_than_sweeps_past_one_batch() {
        let store = SqliteImageCacheStorage::open_in_memory().await.unwrap();
        let stale = Utc::now() - Duration::days(30);

        for i in 0..600 {
            store
                .insert_with_timestamp(&format!("https://example.com/{i}.png"), &[1], stale)
                .await
                .unwrap();
        }

        let deleted = store.delete_older_than(Duration::days(7)).await.unwrap();

        assert_eq!(deleted, 600);
        assert_eq!(row_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_open_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);

        {
            let store = SqliteImageCacheStorage::open(&path).await.unwrap();
            store.save_image("https://example.com/a.png", &[4, 2]).await.unwrap();
        }

        let store = SqliteImageCacheStorage::open(&path).await.unwrap();
        assert_eq!(
            store.load_image("https://example.com/a.png").await.unwrap(),
            Some(vec![4, 2])
        );
    }
}
