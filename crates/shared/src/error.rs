use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogErrorCode {
    Unauthorized,
    NotFound,
    RateLimited,
    Upstream,
    Decode,
    Transport,
}

impl CatalogErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::Upstream,
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct CatalogException {
    pub code: CatalogErrorCode,
    pub message: String,
}

impl CatalogException {
    pub fn new(code: CatalogErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds the error for a non-success HTTP status, preferring the
    /// catalog-supplied message when present.
    pub fn from_status(status: u16, catalog_message: Option<&str>) -> Self {
        let message = match catalog_message {
            Some(message) => format!("HTTP {status}: {message}"),
            None => format!("HTTP {status}"),
        };
        Self::new(CatalogErrorCode::from_status(status), message)
    }
}
