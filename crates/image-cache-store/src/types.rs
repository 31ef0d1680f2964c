//! Cache record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One cached image: the URL it was fetched from, the raw encoded bytes as
/// they arrived off the wire, and the last-write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CacheEntry {
    pub url: String,
    pub image_data: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_serialization() {
        let entry = CacheEntry {
            url: "https://example.com/a.png".to_string(),
            image_data: vec![1, 2, 3],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("https://example.com/a.png"));

        let deserialized: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.url, entry.url);
        assert_eq!(deserialized.image_data, entry.image_data);
    }
}
