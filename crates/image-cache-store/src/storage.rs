//! Storage contract for the image cache
//!
//! The cacher and loader above this crate only ever see this trait; they
//! never touch records or SQL directly.

use crate::error::Result;
use async_trait::async_trait;
use chrono::Duration;

/// Abstract key -> (bytes, timestamp) store backing the image cache.
///
/// Implementations must keep at most one live entry per URL: `save_image`
/// is find-or-create, never insert-another.
#[async_trait]
pub trait ImageCacheStorage: Send + Sync {
    /// Look up the entry whose URL exactly matches `url` and return its
    /// raw bytes. Read-only.
    async fn load_image(&self, url: &str) -> Result<Option<Vec<u8>>>;

    /// Store `image_data` under `url`, stamping the entry with the current
    /// time. Creates the entry on first save and overwrites bytes and
    /// timestamp on every later save for the same URL. Empty `image_data`
    /// is a no-op.
    async fn save_image(&self, url: &str, image_data: &[u8]) -> Result<()>;

    /// Delete every entry last written before `now - max_age`. Returns the
    /// number of entries removed.
    async fn delete_older_than(&self, max_age: Duration) -> Result<u64>;
}
