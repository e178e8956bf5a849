//! The search context: filter state, fetch session, and the derived view.
//!
//! [`AppState`] is created once when the driver starts and dropped when it
//! stops. Nothing in it is global. The session fields are only changed through
//! the transition methods here, which [`handle_event`](super::handle_event)
//! calls.

use super::filter::{self, FilteredView};
use super::modes::SearchStatus;
use crate::domain::{FilterState, RawMovieRecord};
use crate::ui::viewmodel::SearchViewModel;
use crate::worker::{RequestToken, SearchOutcome};

/// Fetch lifecycle of the current query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    pub status: SearchStatus,

    /// Last successful result set, replaced wholesale on every success.
    pub raw_results: Vec<RawMovieRecord>,

    /// Remote total across all pages.
    pub total_count: u64,

    pub error_message: Option<String>,

    /// Query of the last request that completed successfully.
    pub last_fetched_query: Option<String>,
}

/// Explicit search context owned by the driver.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current location query string, as last navigated to.
    pub location: String,

    /// Parameters parsed from [`location`](Self::location).
    pub filters: FilterState,

    pub session: SearchSession,

    /// `session.raw_results` refined by the current type and year.
    pub filtered: FilteredView,

    /// Query of the most recently issued request, successful or not.
    last_requested_query: Option<String>,

    /// Highest token handed out so far. Never reset.
    last_token: RequestToken,

    /// Token of the request whose response may still be applied.
    pending: Option<RequestToken>,
}

impl AppState {
    /// Creates an idle context with no location.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsearch::app::{AppState, SearchStatus};
    ///
    /// let state = AppState::new();
    /// assert_eq!(state.session.status, SearchStatus::Idle);
    /// assert!(state.pending_token().is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the in-flight request that will be applied on completion.
    #[must_use]
    pub const fn pending_token(&self) -> Option<RequestToken> {
        self.pending
    }

    /// Query of the most recently issued request.
    #[must_use]
    pub fn last_requested_query(&self) -> Option<&str> {
        self.last_requested_query.as_deref()
    }

    /// Whether navigating to `filters` requires a new request.
    #[must_use]
    pub fn needs_fetch(&self, filters: &FilterState) -> bool {
        filters.has_query() && self.last_requested_query() != Some(filters.trimmed_query())
    }

    /// Returns to `Idle`, dropping results and the pending request.
    pub(crate) fn reset_to_idle(&mut self) {
        tracing::debug!(pending = ?self.pending, "search session reset to idle");
        self.session = SearchSession::default();
        self.last_requested_query = None;
        self.pending = None;
        self.filtered = FilteredView::default();
    }

    /// Enters `Loading` for `query` and returns the token of the new request.
    ///
    /// Stale results and errors are cleared immediately so nothing from the
    /// previous query is shown while the request is in flight.
    pub(crate) fn begin_search(&mut self, query: &str) -> RequestToken {
        let token = self.last_token.next();
        self.last_token = token;
        self.pending = Some(token);
        self.last_requested_query = Some(query.to_string());

        self.session.status = SearchStatus::Loading;
        self.session.raw_results.clear();
        self.session.total_count = 0;
        self.session.error_message = None;

        tracing::debug!(%token, query, "search issued");
        token
    }

    /// Applies the outcome of the pending request.
    ///
    /// Returns `false` and leaves the session untouched when `token` is not the
    /// pending one.
    pub(crate) fn complete_search(
        &mut self,
        token: RequestToken,
        query: &str,
        outcome: &SearchOutcome,
    ) -> bool {
        if self.pending != Some(token) {
            tracing::debug!(
                %token,
                pending = ?self.pending,
                query,
                "discarding stale search response"
            );
            return false;
        }
        self.pending = None;

        match outcome {
            SearchOutcome::Found {
                results,
                total_count,
            } => {
                self.session.status = SearchStatus::Success;
                self.session.raw_results.clone_from(results);
                self.session.total_count = *total_count;
                self.session.error_message = None;
                self.session.last_fetched_query = Some(query.to_string());
                tracing::debug!(%token, query, cached = results.len(), total_count, "search succeeded");
            }
            SearchOutcome::Rejected { message } | SearchOutcome::Failed { message } => {
                self.session.status = SearchStatus::Error;
                self.session.raw_results.clear();
                self.session.total_count = 0;
                self.session.error_message = Some(message.clone());
                tracing::warn!(%token, query, error = %message, "search failed");
            }
        }
        true
    }

    /// Recomputes [`filtered`](Self::filtered) from the cached results and the
    /// current refinements.
    pub fn apply_local_filters(&mut self) {
        self.filtered = filter::apply(
            &self.session.raw_results,
            &self.filters.type_filter,
            &self.filters.year_filter,
        );
    }

    /// Derives the view handed to the presenter.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsearch::app::AppState;
    ///
    /// let view = AppState::new().compute_viewmodel();
    /// assert!(view.items.is_empty());
    /// assert_eq!(view.heading, "Search movies");
    /// assert!(view.summary.is_none());
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self) -> SearchViewModel {
        SearchViewModel::from_parts(&self.filters, &self.session, &self.filtered)
    }
}
