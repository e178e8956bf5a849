//! Single-threaded cooperative driver for the search state machine.
//!
//! [`SearchRuntime`] owns the search context for its whole lifetime. It feeds
//! events into [`handle_event`], executes the returned actions, and keeps
//! every in-flight worker request in one [`FuturesUnordered`] set that is
//! polled only when the caller awaits [`SearchRuntime::next_response`].
//!
//! ```text
//! dispatch(event) ─▶ handle_event ─▶ PushLocation ─▶ dispatch(Navigate)
//!                                 └▶ PostToWorker ─▶ in_flight
//! next_response() ◀── in_flight.next() ──▶ dispatch(WorkerResponse)
//! ```
//!
//! Overlapping requests are never cancelled. A response for a superseded
//! request still completes; the orchestrator drops it by token.

use crate::app::{handle_event, Action, AppState, Event};
use crate::client::SearchApi;
use crate::domain::Result;
use crate::ui::SearchViewModel;
use crate::worker::{SearchWorker, WorkerMessage, WorkerResponse};
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;

pub struct SearchRuntime {
    state: AppState,
    worker: SearchWorker,
    in_flight: FuturesUnordered<BoxFuture<'static, WorkerResponse>>,
}

impl std::fmt::Debug for SearchRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRuntime")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl SearchRuntime {
    /// Creates a runtime with a fresh, idle search context.
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self::with_state(AppState::new(), api)
    }

    /// Creates a runtime around an existing context.
    #[must_use]
    pub fn with_state(state: AppState, api: Arc<dyn SearchApi>) -> Self {
        Self {
            state,
            worker: SearchWorker::new(api),
            in_flight: FuturesUnordered::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Current location query string.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.state.location
    }

    #[must_use]
    pub fn viewmodel(&self) -> SearchViewModel {
        self.state.compute_viewmodel()
    }

    /// Number of worker requests that have not completed yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Handles `event` and every event its actions lead to.
    ///
    /// Returns whether the derived view may have changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut queue = VecDeque::from([event]);
        let mut changed = false;

        while let Some(event) = queue.pop_front() {
            let (event_changed, actions) = handle_event(&mut self.state, &event)?;
            changed |= event_changed;

            for action in actions {
                match action {
                    Action::PostToWorker(message) => self.post_to_worker(message),
                    Action::PushLocation(location) => {
                        tracing::debug!(location = %location, "pushing location");
                        queue.push_back(Event::Navigate { location });
                    }
                }
            }
        }

        Ok(changed)
    }

    /// Starts a detail lookup. The result arrives through [`next_response`](Self::next_response).
    pub fn request_details(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        let _span = tracing::debug_span!("request_details", imdb_id = %imdb_id).entered();
        self.post_to_worker(WorkerMessage::load_details(imdb_id));
    }

    /// Starts a popular-titles lookup. The search session is not involved.
    pub fn request_popular(&mut self) {
        let _span = tracing::debug_span!("request_popular").entered();
        self.post_to_worker(WorkerMessage::load_popular());
    }

    /// Waits for the next request to complete and dispatches its response.
    ///
    /// Returns `Ok(None)` when nothing is in flight. Cancel-safe: dropping the
    /// returned future before it resolves loses no response.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub async fn next_response(&mut self) -> Result<Option<WorkerResponse>> {
        let Some(response) = self.in_flight.next().await else {
            return Ok(None);
        };
        self.dispatch(Event::WorkerResponse(response.clone()))?;
        Ok(Some(response))
    }

    /// Drives every in-flight request to completion.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub async fn settle(&mut self) -> Result<()> {
        while self.next_response().await?.is_some() {}
        Ok(())
    }

    /// Tears the runtime down, dropping unfinished requests, and returns the context.
    #[must_use]
    pub fn shutdown(self) -> AppState {
        if !self.in_flight.is_empty() {
            tracing::debug!(in_flight = self.in_flight.len(), "dropping unfinished requests");
        }
        self.state
    }

    fn post_to_worker(&mut self, message: WorkerMessage) {
        tracing::debug!(message_type = message.kind(), "posting message to worker");
        let worker = self.worker.clone();
        self.in_flight
            .push(async move { worker.handle_message(message).await }.boxed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchStatus;
    use crate::client::{DetailPayload, SearchPayload, SearchQuery};
    use crate::domain::RawMovieRecord;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingApi {
        searches: Mutex<usize>,
    }

    #[async_trait]
    impl SearchApi for CountingApi {
        async fn search(&self, query: &SearchQuery) -> Result<SearchPayload> {
            *self.searches.lock().unwrap() += 1;
            Ok(SearchPayload {
                success: true,
                results: vec![
                    RawMovieRecord::from_pairs([("Title", query.query.as_str()), ("Type", "movie")]),
                    RawMovieRecord::from_pairs([("Title", "Other"), ("Type", "series")]),
                ],
                total_results: 2,
                error: None,
            })
        }

        async fn fetch_details(&self, imdb_id: &str) -> Result<DetailPayload> {
            Ok(DetailPayload {
                success: true,
                record: RawMovieRecord::from_pairs([("imdbID", imdb_id), ("Title", "Heat")]),
                error: None,
            })
        }

        async fn popular(&self) -> Result<Vec<RawMovieRecord>> {
            Ok(vec![RawMovieRecord::from_pairs([("Title", "Ronin"), ("Type", "movie")])])
        }
    }

    #[tokio::test]
    async fn user_edit_round_trips_through_location() {
        let api = Arc::new(CountingApi::default());
        let mut runtime = SearchRuntime::new(api.clone());

        runtime.dispatch(Event::SubmitQuery("heat".to_string())).expect("dispatch");
        assert_eq!(runtime.location(), "q=heat");
        assert_eq!(runtime.in_flight(), 1);
        assert_eq!(runtime.state().session.status, SearchStatus::Loading);

        runtime.settle().await.expect("settle");
        assert_eq!(runtime.state().session.status, SearchStatus::Success);
        assert_eq!(runtime.viewmodel().shown_count(), 2);
        assert_eq!(*api.searches.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn refinements_never_reach_the_api() {
        let api = Arc::new(CountingApi::default());
        let mut runtime = SearchRuntime::new(api.clone());

        runtime.dispatch(Event::navigate("?q=heat")).expect("dispatch");
        runtime.settle().await.expect("settle");

        runtime.dispatch(Event::SetTypeFilter("series".to_string())).expect("dispatch");
        runtime.dispatch(Event::SetYearFilter("19".to_string())).expect("dispatch");
        runtime.dispatch(Event::ClearFilters).expect("dispatch");
        runtime.dispatch(Event::SetTypeFilter("MOVIE".to_string())).expect("dispatch");

        assert_eq!(runtime.in_flight(), 0);
        assert_eq!(*api.searches.lock().unwrap(), 1);
        assert_eq!(runtime.location(), "q=heat&type=MOVIE");
        let view = runtime.viewmodel();
        assert_eq!(view.shown_count(), 1);
        assert_eq!(view.summary.as_deref(), Some("Showing 1 of 2 results for \"heat\""));
    }

    #[tokio::test]
    async fn details_come_back_without_touching_the_session() {
        let mut runtime = SearchRuntime::new(Arc::new(CountingApi::default()));
        runtime.request_details("tt0113277");

        let response = runtime.next_response().await.expect("dispatch");
        assert!(matches!(response, Some(WorkerResponse::DetailsLoaded { ref imdb_id, .. }) if imdb_id == "tt0113277"));
        assert_eq!(runtime.state().session.status, SearchStatus::Idle);
        assert!(runtime.next_response().await.expect("dispatch").is_none());
    }

    #[tokio::test]
    async fn popular_titles_do_not_disturb_a_settled_search() {
        let api = Arc::new(CountingApi::default());
        let mut runtime = SearchRuntime::new(api.clone());
        runtime.dispatch(Event::navigate("?q=heat")).expect("dispatch");
        runtime.settle().await.expect("settle");
        let before = runtime.viewmodel();

        runtime.request_popular();
        let response = runtime.next_response().await.expect("dispatch");
        assert!(matches!(response, Some(WorkerResponse::PopularLoaded { ref movies }) if movies.len() == 1));
        assert_eq!(runtime.viewmodel(), before);
        assert_eq!(*api.searches.lock().unwrap(), 1);
    }

    #[test]
    fn shutdown_returns_context_with_requests_dropped() {
        let mut runtime = SearchRuntime::new(Arc::new(CountingApi::default()));
        runtime.dispatch(Event::navigate("q=heat")).expect("dispatch");
        let state = runtime.shutdown();
        assert_eq!(state.session.status, SearchStatus::Loading);
        assert!(state.pending_token().is_some());
    }
}
