//! Executes worker messages against a [`SearchApi`].
//!
//! The worker holds no session state. Each message becomes one API call and
//! one [`WorkerResponse`]; failures are folded into the response so the
//! orchestrator always hears back about every request it issued.

use crate::client::{SearchApi, SearchQuery};
use crate::domain::error::{Result, MOVIE_NOT_FOUND};
use crate::domain::{normalize, normalize_details};
use crate::worker::{RequestToken, SearchOutcome, TraceContext, WorkerMessage, WorkerResponse};
use std::sync::Arc;
use tracing::Instrument;

/// Stateless executor for [`WorkerMessage`]s. Cheap to clone.
#[derive(Clone)]
pub struct SearchWorker {
    api: Arc<dyn SearchApi>,
}

impl std::fmt::Debug for SearchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchWorker").finish_non_exhaustive()
    }
}

impl SearchWorker {
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    /// Processes a message and returns the response for the orchestrator.
    ///
    /// The operation runs inside a `worker_handle_message` span whose parent is
    /// the span that built the message, when its trace context is available.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        Self::attach_parent_trace_context(&span, &message);

        async move {
            match message {
                WorkerMessage::Search {
                    token, query, page, ..
                } => self.handle_search(token, query, page).await,
                WorkerMessage::LoadDetails { imdb_id, .. } => {
                    self.handle_load_details(imdb_id).await
                }
                WorkerMessage::LoadPopular { .. } => self.handle_load_popular().await,
            }
        }
        .instrument(span)
        .await
    }

    /// Re-parents `span` under the remote context carried by `message`.
    fn attach_parent_trace_context(span: &tracing::Span, message: &WorkerMessage) {
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        if let Some(parent) = message
            .trace_context()
            .and_then(TraceContext::to_otel_context)
        {
            span.set_parent(parent);
        }
    }

    async fn handle_search(&self, token: RequestToken, query: String, page: u32) -> WorkerResponse {
        let outcome = match self.api.search(&SearchQuery::new(query.clone(), page)).await {
            Ok(payload) => {
                tracing::debug!(%token, success = payload.success, results = payload.results.len(), "search answered");
                SearchOutcome::from_payload(payload)
            }
            Err(e) => {
                tracing::debug!(%token, error = %e, "search request failed");
                SearchOutcome::from_error(&e)
            }
        };

        WorkerResponse::SearchCompleted {
            token,
            query,
            outcome,
        }
    }

    async fn handle_load_details(&self, imdb_id: String) -> WorkerResponse {
        let result = self.api.fetch_details(&imdb_id).await;

        Self::handle_api_result("load details", result, |payload| {
            if payload.success {
                WorkerResponse::DetailsLoaded {
                    details: normalize_details(&payload.record),
                    imdb_id,
                }
            } else {
                WorkerResponse::Error {
                    message: payload.error.unwrap_or_else(|| MOVIE_NOT_FOUND.to_string()),
                }
            }
        })
    }

    async fn handle_load_popular(&self) -> WorkerResponse {
        let result = self.api.popular().await;

        Self::handle_api_result("load popular", result, |records| WorkerResponse::PopularLoaded {
            movies: records.iter().map(normalize).collect(),
        })
    }

    /// Logs the result of an API call and maps failures to [`WorkerResponse::Error`].
    fn handle_api_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "api call successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "api call failed");
                WorkerResponse::Error {
                    message: e.user_message(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DetailPayload, SearchPayload};
    use crate::domain::{RawMovieRecord, ReelsearchError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeApi {
        search_calls: Mutex<Vec<SearchQuery>>,
        search_result: fn() -> Result<SearchPayload>,
        details_result: fn() -> Result<DetailPayload>,
    }

    impl FakeApi {
        fn new(
            search_result: fn() -> Result<SearchPayload>,
            details_result: fn() -> Result<DetailPayload>,
        ) -> Self {
            Self {
                search_calls: Mutex::new(Vec::new()),
                search_result,
                details_result,
            }
        }
    }

    #[async_trait]
    impl SearchApi for FakeApi {
        async fn search(&self, query: &SearchQuery) -> Result<SearchPayload> {
            self.search_calls.lock().unwrap().push(query.clone());
            (self.search_result)()
        }

        async fn fetch_details(&self, _imdb_id: &str) -> Result<DetailPayload> {
            (self.details_result)()
        }

        async fn popular(&self) -> Result<Vec<RawMovieRecord>> {
            (self.search_result)().map(|payload| payload.results)
        }
    }

    fn one_hit() -> Result<SearchPayload> {
        Ok(SearchPayload {
            success: true,
            results: vec![RawMovieRecord::from_pairs([("Title", "Heat")])],
            total_results: 1,
            error: None,
        })
    }

    fn timeout() -> Result<SearchPayload> {
        Err(ReelsearchError::Transport("Request timed out".to_string()))
    }

    fn heat_details() -> Result<DetailPayload> {
        Ok(DetailPayload {
            success: true,
            record: RawMovieRecord::from_pairs([("Title", "Heat"), ("Director", "Michael Mann")]),
            error: None,
        })
    }

    fn not_found() -> Result<DetailPayload> {
        Err(ReelsearchError::NotFound(MOVIE_NOT_FOUND.to_string()))
    }

    #[tokio::test]
    async fn search_response_echoes_token_and_query() {
        let api = Arc::new(FakeApi::new(one_hit, heat_details));
        let worker = SearchWorker::new(api.clone());

        let response = worker
            .handle_message(WorkerMessage::search(RequestToken(7), "heat".to_string(), 1))
            .await;

        match response {
            WorkerResponse::SearchCompleted {
                token,
                query,
                outcome: SearchOutcome::Found { results, total_count },
            } => {
                assert_eq!(token, RequestToken(7));
                assert_eq!(query, "heat");
                assert_eq!(results.len(), 1);
                assert_eq!(total_count, 1);
            }
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(*api.search_calls.lock().unwrap(), vec![SearchQuery::new("heat", 1)]);
    }

    #[tokio::test]
    async fn transport_failure_still_completes_the_search() {
        let worker = SearchWorker::new(Arc::new(FakeApi::new(timeout, heat_details)));

        let response = worker
            .handle_message(WorkerMessage::search(RequestToken(1), "heat".to_string(), 1))
            .await;

        assert_eq!(
            response,
            WorkerResponse::SearchCompleted {
                token: RequestToken(1),
                query: "heat".to_string(),
                outcome: SearchOutcome::Failed {
                    message: "Request timed out".to_string()
                },
            }
        );
    }

    #[tokio::test]
    async fn details_are_normalized() {
        let worker = SearchWorker::new(Arc::new(FakeApi::new(one_hit, heat_details)));

        let response = worker
            .handle_message(WorkerMessage::load_details("tt0113277".to_string()))
            .await;

        match response {
            WorkerResponse::DetailsLoaded { imdb_id, details } => {
                assert_eq!(imdb_id, "tt0113277");
                assert_eq!(details.director.as_deref(), Some("Michael Mann"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_details_become_error_response() {
        let worker = SearchWorker::new(Arc::new(FakeApi::new(one_hit, not_found)));

        let response = worker
            .handle_message(WorkerMessage::load_details("tt0".to_string()))
            .await;

        assert_eq!(
            response,
            WorkerResponse::Error {
                message: MOVIE_NOT_FOUND.to_string()
            }
        );
    }

    #[tokio::test]
    async fn popular_titles_are_normalized_without_searching() {
        let api = Arc::new(FakeApi::new(one_hit, heat_details));
        let worker = SearchWorker::new(api.clone());

        let response = worker.handle_message(WorkerMessage::load_popular()).await;

        match response {
            WorkerResponse::PopularLoaded { movies } => {
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].title.as_deref(), Some("Heat"));
            }
            other => panic!("unexpected response {other:?}"),
        }
        assert!(api.search_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn popular_failure_becomes_error_response() {
        let worker = SearchWorker::new(Arc::new(FakeApi::new(timeout, heat_details)));

        let response = worker.handle_message(WorkerMessage::load_popular()).await;

        assert_eq!(
            response,
            WorkerResponse::Error {
                message: "Request timed out".to_string()
            }
        );
    }
}
