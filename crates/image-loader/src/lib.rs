//! Async image loading with a persistent byte cache
//!
//! Fetches an image from a URL once, keeps the raw bytes in a local store,
//! and serves every later load for that URL from the store. One core
//! cache-or-fetch path, exposed both as an async fn and as a
//! callback-taking form.

pub mod error;
pub mod loader;

pub use error::{LoadError, Result};
pub use loader::ImageLoader;

pub use image::DynamicImage;
