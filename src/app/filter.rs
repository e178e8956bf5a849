//! Local refinement of a cached result set by type and year.
//!
//! Runs synchronously over records already in the session; it never touches
//! the network and never mutates its input.

use crate::domain::{normalize, CanonicalMovieSummary, RawMovieRecord};

/// Result of applying the local refinements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    /// Matching records, normalized, in the order of the cached set.
    pub items: Vec<CanonicalMovieSummary>,

    /// Number of non-empty refinements that were applied (0 to 2).
    pub applied_filter_count: usize,
}

/// Filters `raw_results` by type and year.
///
/// - Type: case-insensitive equality with the normalized `type`. Empty matches all.
/// - Year: substring containment in the normalized `year`, so `"19"` matches
///   both `"1999"` and `"2019"`. Empty matches all.
///
/// A record missing the field a non-empty refinement looks at does not match.
///
/// # Examples
///
/// ```
/// use reelsearch::app::filter::apply;
/// use reelsearch::domain::RawMovieRecord;
///
/// let raws = vec![
///     RawMovieRecord::from_pairs([("Title", "A"), ("Year", "1999")]),
///     RawMovieRecord::from_pairs([("Title", "B"), ("Year", "2019")]),
///     RawMovieRecord::from_pairs([("Title", "C"), ("Year", "2005")]),
/// ];
/// let view = apply(&raws, "", "19");
/// let titles: Vec<_> = view.items.iter().filter_map(|m| m.title.as_deref()).collect();
/// assert_eq!(titles, ["A", "B"]);
/// assert_eq!(view.applied_filter_count, 1);
/// ```
#[must_use]
pub fn apply(raw_results: &[RawMovieRecord], type_filter: &str, year_filter: &str) -> FilteredView {
    let type_filter = type_filter.trim();
    let year_filter = year_filter.trim();

    let items: Vec<CanonicalMovieSummary> = raw_results
        .iter()
        .map(normalize)
        .filter(|movie| matches_type(movie, type_filter) && matches_year(movie, year_filter))
        .collect();

    let applied_filter_count =
        usize::from(!type_filter.is_empty()) + usize::from(!year_filter.is_empty());

    tracing::debug!(
        cached = raw_results.len(),
        shown = items.len(),
        type_filter,
        year_filter,
        "local filters applied"
    );

    FilteredView {
        items,
        applied_filter_count,
    }
}

fn matches_type(movie: &CanonicalMovieSummary, type_filter: &str) -> bool {
    type_filter.is_empty()
        || movie
            .kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case(type_filter))
}

fn matches_year(movie: &CanonicalMovieSummary, year_filter: &str) -> bool {
    year_filter.is_empty()
        || movie
            .year
            .as_deref()
            .is_some_and(|year| year.contains(year_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, kind: &str, year: &str) -> RawMovieRecord {
        RawMovieRecord::from_pairs([("Title", title), ("Type", kind), ("Year", year)])
    }

    fn titles(view: &FilteredView) -> Vec<&str> {
        view.items.iter().filter_map(|m| m.title.as_deref()).collect()
    }

    fn sample() -> Vec<RawMovieRecord> {
        vec![
            record("Batman Begins", "movie", "2005"),
            record("Batman: The Animated Series", "series", "1992–1995"),
            record("Batman", "MOVIE", "1989"),
            RawMovieRecord::from_pairs([("title", "The Batman"), ("type", "Movie"), ("year", "2022")]),
            record("Batman Beyond", "series", "1999–2001"),
        ]
    }

    #[test]
    fn empty_refinements_keep_everything_in_order() {
        let raws = sample();
        let view = apply(&raws, "", "");
        assert_eq!(view.items.len(), raws.len());
        assert_eq!(view.applied_filter_count, 0);
        assert_eq!(titles(&view)[0], "Batman Begins");
        assert_eq!(titles(&view)[4], "Batman Beyond");
    }

    #[test]
    fn type_matches_case_insensitively_and_preserves_order() {
        let view = apply(&sample(), "movie", "");
        assert_eq!(titles(&view), ["Batman Begins", "Batman", "The Batman"]);
        assert_eq!(view.applied_filter_count, 1);

        let upper = apply(&sample(), "SERIES", "");
        assert_eq!(titles(&upper), ["Batman: The Animated Series", "Batman Beyond"]);
    }

    #[test]
    fn year_is_a_substring_match() {
        let raws = vec![
            RawMovieRecord::from_pairs([("Title", "a"), ("Year", "1999")]),
            RawMovieRecord::from_pairs([("Title", "b"), ("Year", "2019")]),
            RawMovieRecord::from_pairs([("Title", "c"), ("Year", "2005")]),
        ];
        assert_eq!(titles(&apply(&raws, "", "19")), ["a", "b"]);
    }

    #[test]
    fn refinements_combine_with_and() {
        let view = apply(&sample(), "series", "199");
        assert_eq!(titles(&view), ["Batman: The Animated Series", "Batman Beyond"]);
        assert_eq!(view.applied_filter_count, 2);

        let none = apply(&sample(), "episode", "199");
        assert!(none.items.is_empty());
    }

    #[test]
    fn records_missing_the_field_do_not_match() {
        let raws = vec![
            RawMovieRecord::from_pairs([("Title", "no type"), ("Type", "N/A")]),
            RawMovieRecord::from_pairs([("Title", "no year")]),
        ];
        assert!(apply(&raws, "movie", "").items.is_empty());
        assert!(apply(&raws, "", "20").items.is_empty());
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let raws = sample();
        assert_eq!(apply(&raws, "movie", "20"), apply(&raws, "movie", "20"));
    }
}
