//! In-memory image cache storage
//!
//! Same contract as the SQLite store, held in a process-local map. Useful
//! for tests and for callers that want caching without persistence.

use crate::error::Result;
use crate::storage::ImageCacheStorage;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredEntry {
    image_data: Vec<u8>,
    timestamp: DateTime<Utc>,
}

/// Image cache storage held entirely in memory
#[derive(Default)]
pub struct MemoryImageCacheStorage {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryImageCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry with an explicit timestamp, for
    /// seeding a store in tests.
    pub async fn insert_with_timestamp(
        &self,
        url: &str,
        image_data: &[u8],
        timestamp: DateTime<Utc>,
    ) {
        self.entries.write().await.insert(
            url.to_string(),
            StoredEntry {
                image_data: image_data.to_vec(),
                timestamp,
            },
        );
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ImageCacheStorage for MemoryImageCacheStorage {
    async fn load_image(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(url).map(|e| e.image_data.clone()))
    }

    async fn save_image(&self, url: &str, image_data: &[u8]) -> Result<()> {
        if image_data.is_empty() {
            return Ok(());
        }
        self.insert_with_timestamp(url, image_data, Utc::now()).await;
        Ok(())
    }

    async fn delete_older_than(&self, max_age: Duration) -> Result<u64> {
        let cutoff = Utc::now() - max_age;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.timestamp >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}
