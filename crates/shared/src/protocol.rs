use serde::{Deserialize, Serialize};

use crate::domain::GameSummary;

/// Fixed page size requested for both the default listing and searches.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Paged envelope returned by the catalog's `/games` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<GameSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingQuery {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListingQuery {
    pub fn default_listing(page_size: u32) -> Self {
        Self {
            page_size,
            search: None,
        }
    }

    pub fn search(query: impl Into<String>, page_size: u32) -> Self {
        Self {
            page_size,
            search: Some(query.into()),
        }
    }
}

/// Error body the catalog sends alongside non-success statuses.
///
/// Not-found responses use `detail`; rejected API keys use `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CatalogErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}
