//! Bidirectional binding between a location query string and [`FilterState`].
//!
//! Recognized parameters are `q`, `type`, `year`, and `page`. Anything else is
//! ignored on parse and never written back.
//!
//! ```text
//! ?q=star%20wars&type=movie&year=19  ⇄  FilterState { "star wars", "movie", "19", 1 }
//! ```

use crate::domain::FilterState;
use std::borrow::Cow;

const QUERY_KEY: &str = "q";
const TYPE_KEY: &str = "type";
const YEAR_KEY: &str = "year";
const PAGE_KEY: &str = "page";

/// Parses a location query string into a [`FilterState`].
///
/// Accepts a bare query string (`q=x`), one with a leading `?`, or a full
/// path/URL (`/search?q=x#top`). Missing parameters default to empty strings
/// and page 1. A `page` that is not a positive integer also becomes 1. When a
/// key repeats, the first occurrence wins.
///
/// # Examples
///
/// ```
/// use reelsearch::infrastructure::location;
///
/// let state = location::parse("/search?q=blade+runner&year=198&page=2");
/// assert_eq!(state.query_text, "blade runner");
/// assert_eq!(state.year_filter, "198");
/// assert_eq!(state.page, 2);
/// assert!(state.type_filter.is_empty());
/// ```
#[must_use]
pub fn parse(location: &str) -> FilterState {
    let mut query_text = None;
    let mut type_filter = None;
    let mut year_filter = None;
    let mut page = None;

    for (key, value) in pairs(query_part(location)) {
        let slot = match &*key {
            QUERY_KEY => &mut query_text,
            TYPE_KEY => &mut type_filter,
            YEAR_KEY => &mut year_filter,
            PAGE_KEY => &mut page,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let page = page
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    FilterState {
        query_text: query_text.unwrap_or_default(),
        type_filter: type_filter.unwrap_or_default(),
        year_filter: year_filter.unwrap_or_default(),
        page,
    }
}

/// Serializes a [`FilterState`] into a query string without the leading `?`.
///
/// Emits only non-empty `q`, `type`, `year`, in that order. `page` is written
/// only when it differs from 1, which only a paging action produces.
///
/// # Examples
///
/// ```
/// use reelsearch::domain::FilterState;
/// use reelsearch::infrastructure::location;
///
/// let state = FilterState::for_query("the thing").with_type("movie");
/// assert_eq!(location::serialize(&state), "q=the%20thing&type=movie");
/// assert_eq!(location::serialize(&FilterState::default()), "");
/// ```
#[must_use]
pub fn serialize(state: &FilterState) -> String {
    let page = (state.page > 1).then(|| state.page.to_string());

    [
        (QUERY_KEY, Some(state.query_text.as_str())),
        (TYPE_KEY, Some(state.type_filter.as_str())),
        (YEAR_KEY, Some(state.year_filter.as_str())),
        (PAGE_KEY, page.as_deref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&")
}

/// Returns the part of `location` between `?` and `#`.
fn query_part(location: &str) -> &str {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains('=') => without_fragment,
        None => "",
    }
}

/// Splits and decodes `key=value` pairs with form-encoding rules (`+` is a space).
fn pairs(query: &str) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
    query.split('&').filter(|pair| !pair.is_empty()).map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (decode_component(key), decode_component(value))
    })
}

fn decode_component(raw: &str) -> Cow<'_, str> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    let decoded = urlencoding::decode(&spaced).map(Cow::into_owned);
    match decoded {
        Ok(decoded) => Cow::Owned(decoded),
        Err(e) => {
            tracing::debug!(component = %raw, error = %e, "invalid percent-encoding, keeping raw text");
            Cow::Owned(spaced.into_owned())
        }
    }
}
