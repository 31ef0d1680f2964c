//! Error types for the image cache store

use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    Database(Box<sqlx::Error>),
    StorePath(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database(err) => write!(f, "Database error: {}", err),
            StorageError::StorePath(msg) => write!(f, "Store path error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
