//! The search-API contract and its HTTP implementation.
//!
//! The orchestrator never talks HTTP itself. The worker calls a [`SearchApi`],
//! which the binary backs with [`HttpSearchClient`] and tests back with fakes.

pub mod http;
pub mod payload;

use crate::domain::{RawMovieRecord, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpSearchClient;
pub use payload::{DetailPayload, SearchPayload};

/// Body of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }
}

/// Remote movie search service.
///
/// Implementations return the decoded payload for any answer the service gave,
/// including application-level failures (`success == false`). `Err` is reserved
/// for answers that never arrived or could not be read.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Runs a search.
    async fn search(&self, query: &SearchQuery) -> Result<SearchPayload>;

    /// Fetches the full record for one IMDb ID.
    async fn fetch_details(&self, imdb_id: &str) -> Result<DetailPayload>;

    /// Fetches the service's curated list of popular titles.
    async fn popular(&self) -> Result<Vec<RawMovieRecord>>;
}
