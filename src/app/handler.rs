//! Event handling and search session transitions.
//!
//! # Event Types
//!
//! - **Location**: `Navigate` is the only event that moves the session
//! - **User edits**: `SubmitQuery`, `SetTypeFilter`, `SetYearFilter`,
//!   `ClearFilters`, `SetPage` produce a new location and nothing else
//! - **Worker**: `WorkerResponse` completes a request, subject to fencing
//!
//! # Fetch decision
//!
//! On `Navigate` the handler compares the trimmed query text with the query of
//! the most recently issued request:
//!
//! | trimmed query          | effect                                  |
//! |------------------------|-----------------------------------------|
//! | empty                  | reset to `Idle`, no request             |
//! | differs from last sent | `Loading`, one `PostToWorker(Search)`   |
//! | same as last sent      | local refinement only                   |
//!
//! # Example
//!
//! ```
//! use reelsearch::app::{handle_event, Action, AppState, Event, SearchStatus};
//!
//! let mut state = AppState::new();
//! let (_, actions) = handle_event(&mut state, &Event::navigate("?q=alien"))?;
//! assert_eq!(state.session.status, SearchStatus::Loading);
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//! # Ok::<(), reelsearch::domain::ReelsearchError>(())
//! ```

use super::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::FilterState;
use crate::infrastructure::location;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Remote page requested for every search.
pub const SEARCH_PAGE: u32 = 1;

/// Inputs to the search state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The authoritative location changed, including on initial mount.
    Navigate {
        /// Query string, with or without the leading `?`.
        location: String,
    },

    /// The user submitted new search text. Refinements are cleared.
    SubmitQuery(String),

    /// The user picked a type refinement (empty clears it).
    SetTypeFilter(String),

    /// The user typed a year refinement (empty clears it).
    SetYearFilter(String),

    /// The user cleared both refinements, keeping the query.
    ClearFilters,

    /// The user moved to another page.
    SetPage(u32),

    /// A worker request finished.
    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Shorthand for [`Event::Navigate`].
    #[must_use]
    pub fn navigate(location: impl Into<String>) -> Self {
        Self::Navigate {
            location: location.into(),
        }
    }

    /// Variant name for span fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::SubmitQuery(_) => "submit_query",
            Self::SetTypeFilter(_) => "set_type_filter",
            Self::SetYearFilter(_) => "set_year_filter",
            Self::ClearFilters => "clear_filters",
            Self::SetPage(_) => "set_page",
            Self::WorkerResponse(_) => "worker_response",
        }
    }
}

/// Processes an event, mutates the search context, and returns actions to run.
///
/// The boolean reports whether the derived view may have changed.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for transitions that
/// validate input.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::Navigate { location } => Ok(navigate(state, location)),

        Event::SubmitQuery(text) => Ok(push(FilterState::for_query(text.trim()))),
        Event::SetTypeFilter(value) => Ok(push(state.filters.with_type(value.trim()))),
        Event::SetYearFilter(value) => Ok(push(state.filters.with_year(value.trim()))),
        Event::ClearFilters => Ok(push(state.filters.cleared_refinements())),
        Event::SetPage(page) => Ok(push(state.filters.with_page(*page))),

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

fn navigate(state: &mut AppState, location: &str) -> (bool, Vec<Action>) {
    let filters = location::parse(location);
    state.location = location.to_string();

    if !filters.has_query() {
        state.filters = filters;
        state.reset_to_idle();
        return (true, vec![]);
    }

    if state.needs_fetch(&filters) {
        let query = filters.trimmed_query().to_string();
        state.filters = filters;
        let token = state.begin_search(&query);
        state.apply_local_filters();
        return (
            true,
            vec![Action::PostToWorker(WorkerMessage::search(
                token,
                query,
                SEARCH_PAGE,
            ))],
        );
    }

    let changed = state.filters != filters;
    state.filters = filters;
    if changed {
        tracing::debug!(
            type_filter = %state.filters.type_filter,
            year_filter = %state.filters.year_filter,
            page = state.filters.page,
            "refinement changed, filtering locally"
        );
        state.apply_local_filters();
    }
    (changed, vec![])
}

fn push(next: FilterState) -> (bool, Vec<Action>) {
    (false, vec![Action::PushLocation(location::serialize(&next))])
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::SearchCompleted {
            token,
            query,
            outcome,
        } => {
            let applied = state.complete_search(*token, query, outcome);
            if applied {
                state.apply_local_filters();
            }
            (applied, vec![])
        }
        WorkerResponse::DetailsLoaded { imdb_id, details } => {
            tracing::info!(
                imdb_id = %imdb_id,
                title = details.summary.title.as_deref().unwrap_or_default(),
                "details loaded"
            );
            (false, vec![])
        }
        WorkerResponse::PopularLoaded { movies } => {
            tracing::info!(count = movies.len(), "popular titles loaded");
            (false, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker request failed");
            (false, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchStatus;
    use crate::domain::RawMovieRecord;
    use crate::worker::{RequestToken, SearchOutcome};

    fn dispatch(state: &mut AppState, event: Event) -> Vec<Action> {
        handle_event(state, &event).expect("handler is infallible").1
    }

    fn searched_token(actions: &[Action]) -> RequestToken {
        match actions {
            [Action::PostToWorker(WorkerMessage::Search { token, .. })] => *token,
            other => panic!("expected one search, got {other:?}"),
        }
    }

    fn completed(token: RequestToken, query: &str, records: Vec<RawMovieRecord>) -> Event {
        Event::WorkerResponse(WorkerResponse::SearchCompleted {
            token,
            query: query.to_string(),
            outcome: SearchOutcome::Found {
                total_count: records.len() as u64,
                results: records,
            },
        })
    }

    fn movie(title: &str, kind: &str, year: &str) -> RawMovieRecord {
        RawMovieRecord::from_pairs([("Title", title), ("Type", kind), ("Year", year)])
    }

    #[test]
    fn navigate_with_query_issues_one_search_on_first_page() {
        let mut state = AppState::new();
        let actions = dispatch(&mut state, Event::navigate("?q=+alien+&page=3"));

        match actions.as_slice() {
            [Action::PostToWorker(WorkerMessage::Search { query, page, .. })] => {
                assert_eq!(query, "alien");
                assert_eq!(*page, SEARCH_PAGE);
            }
            other => panic!("unexpected actions {other:?}"),
        }
        assert_eq!(state.session.status, SearchStatus::Loading);
        assert_eq!(state.filters.page, 3);
    }

    #[test]
    fn empty_query_resets_to_idle_without_request() {
        let mut state = AppState::new();
        let token = searched_token(&dispatch(&mut state, Event::navigate("q=alien")));
        dispatch(&mut state, completed(token, "alien", vec![movie("Alien", "movie", "1979")]));
        assert_eq!(state.session.status, SearchStatus::Success);

        let actions = dispatch(&mut state, Event::navigate("?q=%20%20&type=movie"));
        assert!(actions.is_empty());
        assert_eq!(state.session.status, SearchStatus::Idle);
        assert!(state.session.raw_results.is_empty());
        assert_eq!(state.session.total_count, 0);
        assert!(state.filtered.items.is_empty());
    }

    #[test]
    fn refinement_change_filters_locally_without_request() {
        let mut state = AppState::new();
        let token = searched_token(&dispatch(&mut state, Event::navigate("q=batman")));
        dispatch(
            &mut state,
            completed(
                token,
                "batman",
                vec![
                    movie("Batman Begins", "movie", "2005"),
                    movie("Batman Beyond", "series", "1999"),
                ],
            ),
        );
        assert_eq!(state.filtered.items.len(), 2);

        let (changed, actions) =
            handle_event(&mut state, &Event::navigate("q=batman&type=series")).expect("ok");
        assert!(changed);
        assert!(actions.is_empty());
        assert_eq!(state.filtered.items.len(), 1);
        assert_eq!(state.filtered.applied_filter_count, 1);
        assert_eq!(state.session.status, SearchStatus::Success);
    }

    #[test]
    fn renavigating_to_same_location_is_a_no_op() {
        let mut state = AppState::new();
        dispatch(&mut state, Event::navigate("q=batman"));
        let (changed, actions) = handle_event(&mut state, &Event::navigate("q=batman")).expect("ok");
        assert!(!changed);
        assert!(actions.is_empty());
    }

    #[test]
    fn refinement_while_loading_does_not_refetch() {
        let mut state = AppState::new();
        let token = searched_token(&dispatch(&mut state, Event::navigate("q=batman")));
        assert!(dispatch(&mut state, Event::navigate("q=batman&year=19")).is_empty());
        assert_eq!(state.pending_token(), Some(token));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = AppState::new();
        let batman = searched_token(&dispatch(&mut state, Event::navigate("q=batman")));
        let superman = searched_token(&dispatch(&mut state, Event::navigate("q=superman")));
        assert!(superman > batman);

        dispatch(&mut state, completed(superman, "superman", vec![movie("Superman", "movie", "1978")]));
        let (changed, _) = handle_event(
            &mut state,
            &completed(batman, "batman", vec![movie("Batman", "movie", "1989")]),
        )
        .expect("ok");

        assert!(!changed);
        assert_eq!(state.session.last_fetched_query.as_deref(), Some("superman"));
        assert_eq!(state.filtered.items[0].title.as_deref(), Some("Superman"));
    }

    #[test]
    fn returning_to_a_query_after_reset_fetches_again() {
        let mut state = AppState::new();
        dispatch(&mut state, Event::navigate("q=alien"));
        dispatch(&mut state, Event::navigate(""));
        let actions = dispatch(&mut state, Event::navigate("q=alien"));
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn error_is_terminal_until_query_changes() {
        let mut state = AppState::new();
        let token = searched_token(&dispatch(&mut state, Event::navigate("q=zzzz")));
        dispatch(
            &mut state,
            Event::WorkerResponse(WorkerResponse::SearchCompleted {
                token,
                query: "zzzz".to_string(),
                outcome: SearchOutcome::Failed {
                    message: "Request timed out".to_string(),
                },
            }),
        );
        assert_eq!(state.session.status, SearchStatus::Error);

        assert!(dispatch(&mut state, Event::navigate("q=zzzz&type=movie")).is_empty());
        assert_eq!(dispatch(&mut state, Event::navigate("q=zzzy")).len(), 1);
    }

    #[test]
    fn user_edits_only_push_locations() {
        let mut state = AppState::new();
        dispatch(&mut state, Event::navigate("q=heat&type=movie&year=1995"));

        let cases = [
            (Event::SubmitQuery("  the thing ".to_string()), "q=the%20thing"),
            (Event::SetTypeFilter("series".to_string()), "q=heat&type=series&year=1995"),
            (Event::SetYearFilter(String::new()), "q=heat&type=movie"),
            (Event::ClearFilters, "q=heat"),
            (Event::SetPage(2), "q=heat&type=movie&year=1995&page=2"),
        ];

        for (event, expected) in cases {
            let before = state.filters.clone();
            let actions = dispatch(&mut state, event);
            assert_eq!(actions, vec![Action::PushLocation(expected.to_string())]);
            assert_eq!(state.filters, before);
        }
    }

    #[test]
    fn detail_responses_leave_session_untouched() {
        let mut state = AppState::new();
        dispatch(&mut state, Event::navigate("q=heat"));
        let before = state.session.clone();

        let (changed, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::Error {
                message: "Movie not found".to_string(),
            }),
        )
        .expect("ok");
        assert!(!changed);
        assert!(actions.is_empty());
        assert_eq!(state.session, before);
    }

    #[test]
    fn popular_titles_leave_session_untouched() {
        let mut state = AppState::new();
        dispatch(&mut state, Event::navigate("q=heat"));
        let before = state.session.clone();
        let pending = state.pending_token();

        let (changed, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::PopularLoaded {
                movies: vec![crate::domain::normalize(&movie("Ronin", "movie", "1998"))],
            }),
        )
        .expect("ok");
        assert!(!changed);
        assert!(actions.is_empty());
        assert_eq!(state.session, before);
        assert_eq!(state.pending_token(), pending);
    }
}
