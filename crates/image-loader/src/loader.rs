//! Cache-or-fetch image loading

use crate::error::{LoadError, Result};
use image::DynamicImage;
use image_cache_store::StorageError;
use image_cacher::ImageCacher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_USER_AGENT: &str = "image-loader/0.1";

/// Loads images by URL, serving from the cache on a hit and falling back
/// to a network fetch on a miss. The raw fetched bytes are stored for the
/// next load; the decoded image is returned to the caller.
#[derive(Clone)]
pub struct ImageLoader {
    cacher: ImageCacher,
    client: reqwest::Client,
}

impl ImageLoader {
    /// Create a loader over an injected cacher.
    pub fn new(cacher: ImageCacher) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { cacher, client }
    }

    /// Create a loader backed by the SQLite store at its default location.
    pub async fn with_default_store() -> std::result::Result<Self, StorageError> {
        let storage = image_cache_store::SqliteImageCacheStorage::open_default().await?;
        Ok(Self::new(ImageCacher::new(Arc::new(storage))))
    }

    /// Load the image at `url`, from cache when possible.
    ///
    /// On a miss the bytes are fetched over HTTP, decoded, stored, and the
    /// decoded image returned. A cached entry that no longer decodes is
    /// treated as a miss and refetched, which overwrites it. Cache writes
    /// are fire-and-forget: a storage failure never fails the load.
    pub async fn load_image(&self, url: &str) -> Result<DynamicImage> {
        if url.is_empty() {
            return Err(LoadError::EmptyUrl);
        }

        if let Some(data) = self.cacher.load_image(url).await {
            match image::load_from_memory(&data) {
                Ok(image) => {
                    debug!(url = %url, "Serving image from cache");
                    return Ok(image);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Cached image no longer decodes, refetching");
                }
            }
        }

        let parsed = Url::parse(url)?;

        debug!(url = %url, "Fetching image");
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Image fetch failed");
            return Err(LoadError::Status(status));
        }

        let data = response.bytes().await?;
        let image = image::load_from_memory(&data)?;

        self.cacher.save_image(url, &data).await;

        debug!(url = %url, size = data.len(), "Fetched and cached image");
        Ok(image)
    }

    /// Callback form of [`load_image`](Self::load_image), with identical
    /// semantics. The load runs on the tokio runtime and `completion` is
    /// invoked on whichever worker thread it completes on; callers that
    /// need a particular thread redispatch themselves.
    pub fn load_image_with<F>(&self, url: &str, completion: F)
    where
        F: FnOnce(Result<DynamicImage>) + Send + 'static,
    {
        let loader = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            completion(loader.load_image(&url).await);
        });
    }
}
