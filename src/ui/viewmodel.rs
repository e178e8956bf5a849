//! View model handed to the presenter.
//!
//! Computed from the search context by
//! [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel).
//! Contains no logic beyond formatting: the presenter decides how to draw it.

use crate::app::{FilteredView, SearchSession, SearchStatus};
use crate::domain::{CanonicalMovieSummary, FilterState};
use serde::Serialize;

/// Derived `(status, filtered results, total count)` snapshot plus display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchViewModel {
    pub status: SearchStatus,

    /// Query text as it appears in the location.
    pub query: String,

    /// Page heading: `Results for "q"`, or `Search movies` without a query.
    pub heading: String,

    /// Records after local refinement, in service order.
    pub items: Vec<CanonicalMovieSummary>,

    /// Remote total across all pages.
    pub total_count: u64,

    /// Number of records in the cached result set before refinement.
    pub cached_count: usize,

    pub applied_filter_count: usize,

    pub error_message: Option<String>,

    /// One-line results summary. `None` while idle.
    pub summary: Option<String>,
}

impl SearchViewModel {
    /// Builds the view model from the pieces of the search context.
    #[must_use]
    pub fn from_parts(filters: &FilterState, session: &SearchSession, filtered: &FilteredView) -> Self {
        let query = filters.query_text.clone();
        let heading = if filters.has_query() {
            format!("Results for \"{query}\"")
        } else {
            "Search movies".to_string()
        };

        let cached_count = session.raw_results.len();
        let shown_count = filtered.items.len();

        let summary = match session.status {
            SearchStatus::Idle => None,
            SearchStatus::Loading => Some("Loading results...".to_string()),
            SearchStatus::Error => Some(format!(
                "Error: {}",
                session.error_message.as_deref().unwrap_or_default()
            )),
            SearchStatus::Success if filtered.applied_filter_count > 0 => Some(format!(
                "Showing {shown_count} of {cached_count} results for \"{query}\""
            )),
            SearchStatus::Success => Some(format!("{cached_count} results found for \"{query}\"")),
        };

        Self {
            status: session.status,
            query,
            heading,
            items: filtered.items.clone(),
            total_count: session.total_count,
            cached_count,
            applied_filter_count: filtered.applied_filter_count,
            error_message: session.error_message.clone(),
            summary,
        }
    }

    /// Number of records shown after refinement.
    #[must_use]
    pub fn shown_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filter;
    use crate::domain::RawMovieRecord;

    fn success(records: Vec<RawMovieRecord>) -> SearchSession {
        SearchSession {
            status: SearchStatus::Success,
            total_count: 120,
            raw_results: records,
            error_message: None,
            last_fetched_query: Some("batman".to_string()),
        }
    }

    fn records() -> Vec<RawMovieRecord> {
        vec![
            RawMovieRecord::from_pairs([("Title", "Batman"), ("Type", "movie")]),
            RawMovieRecord::from_pairs([("Title", "Batman Beyond"), ("Type", "series")]),
        ]
    }

    #[test]
    fn unrefined_summary_counts_cached_results() {
        let filters = FilterState::for_query("batman");
        let session = success(records());
        let view = filter::apply(&session.raw_results, "", "");

        let vm = SearchViewModel::from_parts(&filters, &session, &view);
        assert_eq!(vm.summary.as_deref(), Some("2 results found for \"batman\""));
        assert_eq!(vm.heading, "Results for \"batman\"");
        assert_eq!(vm.total_count, 120);
    }

    #[test]
    fn refined_summary_shows_fraction() {
        let filters = FilterState::for_query("batman").with_type("series");
        let session = success(records());
        let view = filter::apply(&session.raw_results, "series", "");

        let vm = SearchViewModel::from_parts(&filters, &session, &view);
        assert_eq!(vm.summary.as_deref(), Some("Showing 1 of 2 results for \"batman\""));
        assert_eq!(vm.shown_count(), 1);
        assert_eq!(vm.cached_count, 2);
    }

    #[test]
    fn loading_and_error_summaries() {
        let filters = FilterState::for_query("x");
        let loading = SearchSession {
            status: SearchStatus::Loading,
            ..SearchSession::default()
        };
        let vm = SearchViewModel::from_parts(&filters, &loading, &FilteredView::default());
        assert_eq!(vm.summary.as_deref(), Some("Loading results..."));

        let failed = SearchSession {
            status: SearchStatus::Error,
            error_message: Some("Movie not found!".to_string()),
            ..SearchSession::default()
        };
        let vm = SearchViewModel::from_parts(&filters, &failed, &FilteredView::default());
        assert_eq!(vm.summary.as_deref(), Some("Error: Movie not found!"));
    }
}
