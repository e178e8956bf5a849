//! URL-derived filter state.
//!
//! [`FilterState`] is the tuple the user edits: free-text query plus the type and
//! year refinements and the page number. It is only ever derived from the
//! current location (see [`crate::infrastructure::location`]); user edits
//! produce a *new* location rather than mutating the state in place.

use serde::{Deserialize, Serialize};

/// The authoritative search parameters.
///
/// Empty strings mean "not set". `page` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query_text: String,
    pub type_filter: String,
    pub year_filter: String,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            type_filter: String::new(),
            year_filter: String::new(),
            page: 1,
        }
    }
}

impl FilterState {
    /// Creates a state for `query` with no refinements on page 1.
    #[must_use]
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query_text: query.into(),
            ..Self::default()
        }
    }

    /// The query with surrounding whitespace removed.
    ///
    /// This is what gets sent to the search service and what fetch decisions
    /// compare against.
    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.query_text.trim()
    }

    /// Whether there is anything to search for.
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.trimmed_query().is_empty()
    }

    /// Same query with a different type refinement, back on page 1.
    #[must_use]
    pub fn with_type(&self, type_filter: impl Into<String>) -> Self {
        Self {
            query_text: self.query_text.clone(),
            type_filter: type_filter.into(),
            year_filter: self.year_filter.clone(),
            page: 1,
        }
    }

    /// Same query with a different year refinement, back on page 1.
    #[must_use]
    pub fn with_year(&self, year_filter: impl Into<String>) -> Self {
        Self {
            query_text: self.query_text.clone(),
            type_filter: self.type_filter.clone(),
            year_filter: year_filter.into(),
            page: 1,
        }
    }

    /// Same query and refinements on another page. Pages below 1 clamp to 1.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Keeps the query, drops both refinements.
    #[must_use]
    pub fn cleared_refinements(&self) -> Self {
        Self::for_query(self.query_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_on_first_page() {
        let state = FilterState::default();
        assert!(!state.has_query());
        assert_eq!(state.page, 1);
        assert!(state.type_filter.is_empty() && state.year_filter.is_empty());
    }

    #[test]
    fn whitespace_query_is_not_a_query() {
        assert!(!FilterState::for_query("   ").has_query());
        assert_eq!(FilterState::for_query("  alien ").trimmed_query(), "alien");
    }

    #[test]
    fn refinement_edits_reset_page() {
        let state = FilterState::for_query("batman").with_page(3);
        assert_eq!(state.page, 3);

        let typed = state.with_type("movie");
        assert_eq!(typed.page, 1);
        assert_eq!(typed.type_filter, "movie");

        let both = typed.with_year("19");
        assert_eq!((both.type_filter.as_str(), both.year_filter.as_str()), ("movie", "19"));
        assert_eq!(both.query_text, "batman");

        let cleared = both.cleared_refinements();
        assert_eq!(cleared, FilterState::for_query("batman"));
    }

    #[test]
    fn page_zero_clamps() {
        assert_eq!(FilterState::for_query("x").with_page(0).page, 1);
    }
}
