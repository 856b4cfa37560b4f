use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{GameDetail, GameId, GameSummary},
    error::{CatalogErrorCode, CatalogException},
    protocol::{CatalogErrorBody, ListingPage, ListingQuery},
};
use tracing::{debug, error};
use url::Url;

pub mod config;

pub use config::{load_settings, ConfigError, Settings};

/// Game metadata source the screens read from.
///
/// Failures are opaque to callers; implementations report them as
/// `anyhow::Error`, typically wrapping a [`CatalogException`].
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_default_listing(&self) -> Result<Vec<GameSummary>>;
    async fn search_listing(&self, query: &str) -> Result<Vec<GameSummary>>;
    async fn fetch_detail(&self, id: GameId) -> Result<GameDetail>;
}

#[derive(Debug, Serialize)]
struct KeyParam<'a> {
    key: &'a str,
}

/// HTTP client for the RAWG video game database.
#[derive(Debug, Clone)]
pub struct RawgClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    page_size: u32,
}

impl RawgClient {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            http: Client::new(),
            base_url: settings.parsed_base_url()?,
            api_key: settings.api_key.clone(),
            page_size: settings.page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.http.get(self.endpoint(path));
        if let Some(key) = self.api_key.as_deref() {
            request = request.query(&KeyParam { key });
        }
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|err| {
            // Drop the url so the api key never reaches the logs.
            let err = err.without_url();
            error!(path, error = %err, "catalog request failed");
            CatalogException::new(CatalogErrorCode::Transport, err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<CatalogErrorBody>(&body).unwrap_or_default();
            let err = CatalogException::from_status(status.as_u16(), parsed.message());
            error!(
                path,
                status = status.as_u16(),
                error = %err,
                "catalog returned an error status"
            );
            return Err(err.into());
        }

        let bytes = response.bytes().await.map_err(|err| {
            let err = err.without_url();
            error!(path, error = %err, "catalog response body could not be read");
            CatalogException::new(CatalogErrorCode::Transport, err.to_string())
        })?;
        let decoded = serde_json::from_slice::<T>(&bytes).map_err(|err| {
            error!(path, error = %err, "catalog response did not decode");
            CatalogException::new(CatalogErrorCode::Decode, err.to_string())
        })?;
        debug!(path, bytes = bytes.len(), "catalog response decoded");
        Ok(decoded)
    }

    async fn listing(&self, query: ListingQuery) -> Result<Vec<GameSummary>> {
        let page: ListingPage = self.get_json("games", Some(&query)).await?;
        Ok(page.results)
    }
}

#[async_trait]
impl CatalogClient for RawgClient {
    async fn fetch_default_listing(&self) -> Result<Vec<GameSummary>> {
        self.listing(ListingQuery::default_listing(self.page_size))
            .await
            .context("failed to fetch games")
    }

    async fn search_listing(&self, query: &str) -> Result<Vec<GameSummary>> {
        self.listing(ListingQuery::search(query, self.page_size))
            .await
            .with_context(|| format!("failed to search games for '{query}'"))
    }

    async fn fetch_detail(&self, id: GameId) -> Result<GameDetail> {
        self.get_json::<GameDetail, ()>(&format!("games/{id}"), None)
            .await
            .with_context(|| format!("failed to fetch details for game {id}"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
