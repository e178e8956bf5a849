//! Lenient decoding of search and detail response bodies.
//!
//! The backend forwards the upstream OMDb shape but also exposes its own
//! serialized flags, so the same fact can arrive under two names
//! (`Response`/`success`, `Search`/`search`, `Error`/`error`). Decoding never
//! fails on a partially-shaped body: a missing array becomes an empty list and
//! a missing count becomes zero.

use crate::domain::RawMovieRecord;
use serde_json::{Map, Value};

/// Message used when the service reports failure without saying why.
pub const DEFAULT_NO_MATCH: &str = "No movies found";

/// Decoded search response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPayload {
    /// Whether the service reported a match.
    pub success: bool,
    /// Result records in service order. Non-object entries are dropped.
    pub results: Vec<RawMovieRecord>,
    /// Total matches across all pages as reported by the service.
    pub total_results: u64,
    /// Service-supplied failure text, if any.
    pub error: Option<String>,
}

impl SearchPayload {
    /// Decodes a response body.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsearch::client::SearchPayload;
    ///
    /// let body = serde_json::json!({
    ///     "Response": "True",
    ///     "Search": [{"Title": "Alien", "Year": "1979"}],
    ///     "totalResultsAsInt": 1
    /// });
    /// let payload = SearchPayload::from_value(&body);
    /// assert!(payload.success);
    /// assert_eq!(payload.results.len(), 1);
    /// assert_eq!(payload.total_results, 1);
    /// ```
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            tracing::warn!("search response body is not an object");
            return Self::default();
        };

        let results: Vec<RawMovieRecord> = field(object, &["Search", "search"])
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .cloned()
                    .filter_map(RawMovieRecord::from_value)
                    .collect()
            })
            .unwrap_or_default();

        let total_results = field(object, &["totalResultsAsInt"])
            .and_then(as_count)
            .or_else(|| field(object, &["totalResults"]).and_then(as_count))
            .unwrap_or(0);

        Self {
            success: success_flag(object),
            results,
            total_results,
            error: error_text(object),
        }
    }

    /// Failure text to show the user.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| DEFAULT_NO_MATCH.to_string())
    }
}

/// Decoded detail response: the record itself plus the success flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPayload {
    pub success: bool,
    pub record: RawMovieRecord,
    pub error: Option<String>,
}

impl DetailPayload {
    /// Decodes a detail response body. A non-object body decodes as a failure.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::default();
        };

        Self {
            success: success_flag(object),
            record: RawMovieRecord::from_value(body.clone()).unwrap_or_default(),
            error: error_text(object),
        }
    }
}

/// Decodes a popular-movies body.
///
/// The service answers with a bare array of summaries; an object carrying a
/// `Search`/`search` array is accepted too. Anything else decodes as empty.
///
/// # Examples
///
/// ```
/// use reelsearch::client::payload::popular_records;
///
/// let body = serde_json::json!([{"Title": "Heat"}, "junk", {"title": "Ronin"}]);
/// assert_eq!(popular_records(&body).len(), 2);
/// ```
#[must_use]
pub fn popular_records(body: &Value) -> Vec<RawMovieRecord> {
    let items = match body {
        Value::Array(items) => Some(items),
        Value::Object(object) => field(object, &["Search", "search"]).and_then(Value::as_array),
        _ => None,
    };

    let Some(items) = items else {
        tracing::warn!("popular movies body has no result array");
        return Vec::new();
    };
    items
        .iter()
        .cloned()
        .filter_map(RawMovieRecord::from_value)
        .collect()
}

/// First value present under any of `names`.
fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// `Response: "True"` (any case, or a JSON `true`) or `success: true`.
fn success_flag(object: &Map<String, Value>) -> bool {
    let truthy = |value: &Value| match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };

    object.get("Response").is_some_and(truthy) || object.get("success").is_some_and(truthy)
}

fn error_text(object: &Map<String, Value>) -> Option<String> {
    field(object, &["Error", "error"])
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Reads a non-negative count from a number or a numeric string.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
