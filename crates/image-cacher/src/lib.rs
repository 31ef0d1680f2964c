//! Image cacher
//!
//! Sits between the loader and the storage adapter. A save stores the raw
//! bytes and then sweeps expired entries; eviction rides on the write path
//! rather than on a scheduled janitor. Storage failures are logged and
//! swallowed here, so a save is fire-and-forget from the caller's view.

use chrono::Duration;
use image_cache_store::ImageCacheStorage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Age past which a cache entry is expired, in seconds.
pub const SEVEN_DAYS_SECS: i64 = 7 * 24 * 60 * 60;

/// Caches raw image bytes keyed by URL, expiring stale entries on write
#[derive(Clone)]
pub struct ImageCacher {
    storage: Arc<dyn ImageCacheStorage>,
    max_age: Duration,
}

impl ImageCacher {
    /// Create a cacher over `storage` with the standard seven-day TTL.
    pub fn new(storage: Arc<dyn ImageCacheStorage>) -> Self {
        Self::with_max_age(storage, Duration::seconds(SEVEN_DAYS_SECS))
    }

    /// Create a cacher with a custom TTL. The production policy is fixed
    /// at seven days; this exists for tests.
    pub fn with_max_age(storage: Arc<dyn ImageCacheStorage>, max_age: Duration) -> Self {
        Self { storage, max_age }
    }

    /// Store `image_data` under `url`, then sweep expired entries.
    ///
    /// Best-effort on both steps: a storage failure is logged and never
    /// surfaced. The sweep runs after every save and may delete expired
    /// entries unrelated to `url`.
    pub async fn save_image(&self, url: &str, image_data: &[u8]) {
        if let Err(e) = self.storage.save_image(url, image_data).await {
            warn!(url = %url, error = %e, "Failed to save image to cache");
        }

        match self.storage.delete_older_than(self.max_age).await {
            Ok(0) => {}
            Ok(deleted) => debug!(deleted, "Swept expired cache entries"),
            Err(e) => warn!(error = %e, "Failed to sweep expired cache entries"),
        }
    }

    /// Fetch the cached bytes for `url`. A storage failure is logged and
    /// reported as a miss.
    pub async fn load_image(&self, url: &str) -> Option<Vec<u8>> {
        match self.storage.load_image(url).await {
            Ok(data) => data,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read image from cache");
                None
            }
        }
    }
}
