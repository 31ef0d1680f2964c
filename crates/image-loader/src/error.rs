//! Error types for image loading

use std::fmt;

#[derive(Debug)]
pub enum LoadError {
    EmptyUrl,
    InvalidUrl(url::ParseError),
    Http(Box<reqwest::Error>),
    Status(reqwest::StatusCode),
    Decode(image::ImageError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::EmptyUrl => write!(f, "Image URL is empty"),
            LoadError::InvalidUrl(err) => write!(f, "Invalid image URL: {}", err),
            LoadError::Http(err) => write!(f, "HTTP error: {}", err),
            LoadError::Status(status) => write!(f, "Image fetch returned status {}", status),
            LoadError::Decode(err) => write!(f, "Image decode error: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::InvalidUrl(err) => Some(err),
            LoadError::Http(err) => Some(err.as_ref()),
            LoadError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<url::ParseError> for LoadError {
    fn from(err: url::ParseError) -> Self {
        LoadError::InvalidUrl(err)
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Http(Box::new(err))
    }
}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        LoadError::Decode(err)
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
