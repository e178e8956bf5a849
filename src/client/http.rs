//! reqwest-backed [`SearchApi`].
//!
//! Endpoints, relative to `Config::api_url`:
//!
//! - `POST /movies/search` with `{"query": .., "page": ..}`
//! - `GET /movies/{imdbId}`
//! - `GET /movies/popular`

use super::payload::popular_records;
use super::{DetailPayload, SearchApi, SearchPayload, SearchQuery};
use crate::domain::error::{DEFAULT_SEARCH_ERROR, MOVIE_NOT_FOUND};
use crate::domain::{RawMovieRecord, ReelsearchError, Result};
use crate::Config;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Fallback message for a failed detail lookup.
const DEFAULT_DETAILS_ERROR: &str = "Error loading movie details";

/// Fallback message for a failed popular-movies request.
const DEFAULT_POPULAR_ERROR: &str = "Error loading popular movies";

pub struct HttpSearchClient {
    client: Client,
    base_url: String,
}

impl HttpSearchClient {
    /// Builds a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ReelsearchError::Config`] if the underlying HTTP client cannot
    /// be constructed (for example, no TLS backend is available).
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ReelsearchError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/movies/search", self.base_url)
    }

    fn popular_url(&self) -> String {
        format!("{}/movies/popular", self.base_url)
    }

    fn details_url(&self, imdb_id: &str) -> String {
        format!("{}/movies/{}", self.base_url, urlencoding::encode(imdb_id.trim()))
    }
}

#[async_trait]
impl SearchApi for HttpSearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPayload> {
        let url = self.search_url();
        tracing::debug!(method = "POST", url = %url, query = %query.query, page = query.page, "api request");

        let response = self.client.post(&url).json(query).send().await?;
        let body = read_json(response, DEFAULT_SEARCH_ERROR).await?;
        Ok(SearchPayload::from_value(&body))
    }

    async fn fetch_details(&self, imdb_id: &str) -> Result<DetailPayload> {
        let url = self.details_url(imdb_id);
        tracing::debug!(method = "GET", url = %url, "api request");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(imdb_id, "movie not found");
            return Err(ReelsearchError::NotFound(MOVIE_NOT_FOUND.to_string()));
        }
        let body = read_json(response, DEFAULT_DETAILS_ERROR).await?;
        Ok(DetailPayload::from_value(&body))
    }

    async fn popular(&self) -> Result<Vec<RawMovieRecord>> {
        let url = self.popular_url();
        tracing::debug!(method = "GET", url = %url, "api request");

        let response = self.client.get(&url).send().await?;
        let body = read_json(response, DEFAULT_POPULAR_ERROR).await?;
        Ok(popular_records(&body))
    }
}

/// Reads a JSON body, turning non-success statuses into transport errors.
///
/// The error text is the body's `message` field when the service supplied one,
/// otherwise `fallback`.
async fn read_json(response: Response, fallback: &str) -> Result<Value> {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");

    if status.is_success() {
        return response
            .json::<Value>()
            .await
            .map_err(|e| ReelsearchError::Payload(format!("failed to parse response: {e}")));
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(|| fallback.to_string(), String::from);

    tracing::warn!(status = status.as_u16(), error = %message, "api error response");
    Err(ReelsearchError::Transport(message))
}
