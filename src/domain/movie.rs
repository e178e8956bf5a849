//! Movie record shapes and the normalizer between them.
//!
//! The remote search service returns loosely-shaped records: the same field may
//! arrive as `Title` or `title`, and missing data is spelled `"N/A"` or `""`.
//! [`RawMovieRecord`] keeps that shape opaque; [`normalize`] and
//! [`normalize_details`] map it into the fixed-shape [`CanonicalMovieSummary`]
//! and [`CanonicalMovieDetails`] used by everything downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel the upstream API uses for "no data".
pub const NOT_AVAILABLE: &str = "N/A";

const TITLE: &[&str] = &["Title", "title"];
const YEAR: &[&str] = &["Year", "year"];
const IMDB_ID: &[&str] = &["imdbID", "imdbId", "ImdbId", "ImdbID"];
const KIND: &[&str] = &["Type", "type"];
const POSTER: &[&str] = &["Poster", "poster"];
const IMDB_RATING: &[&str] = &["imdbRating", "ImdbRating"];

const RUNTIME: &[&str] = &["Runtime", "runtime"];
const COUNTRY: &[&str] = &["Country", "country"];
const PLOT: &[&str] = &["Plot", "plot"];
const DIRECTOR: &[&str] = &["Director", "director"];
const WRITER: &[&str] = &["Writer", "writer"];
const ACTORS: &[&str] = &["Actors", "actors"];
const GENRE: &[&str] = &["Genre", "genre"];
const LANGUAGE: &[&str] = &["Language", "language"];
const RATED: &[&str] = &["Rated", "rated"];
const RELEASED: &[&str] = &["Released", "released"];
const BOX_OFFICE: &[&str] = &["BoxOffice", "boxOffice"];
const AWARDS: &[&str] = &["Awards", "awards"];
const IMDB_VOTES: &[&str] = &["imdbVotes", "ImdbVotes"];

/// Unnormalized record as returned by the search or detail endpoint.
///
/// Keys and casing are whatever the upstream sent. Values are read as text:
/// strings as-is, numbers and booleans in their display form, anything else
/// (arrays, objects, null) as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMovieRecord(Map<String, Value>);

impl RawMovieRecord {
    /// Builds a record from string pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsearch::domain::RawMovieRecord;
    ///
    /// let record = RawMovieRecord::from_pairs([("Title", "Heat"), ("Year", "1995")]);
    /// assert_eq!(record.get("Year").as_deref(), Some("1995"));
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Wraps a JSON value if it is an object; `None` otherwise.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the textual value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Fixed-shape summary of a search hit.
///
/// Every field is either a meaningful, trimmed, non-empty string or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMovieSummary {
    pub title: Option<String>,
    pub year: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub poster: Option<String>,
    pub imdb_rating: Option<String>,
}

/// Fixed-shape record for the detail view: the summary fields plus the long form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMovieDetails {
    #[serde(flatten)]
    pub summary: CanonicalMovieSummary,
    pub runtime: Option<String>,
    pub country: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub box_office: Option<String>,
    pub awards: Option<String>,
    pub imdb_votes: Option<String>,
}

/// Returns `true` if `value` carries no information.
///
/// A value is absent when it is empty after trimming or equals `"N/A"`.
///
/// # Examples
///
/// ```
/// use reelsearch::domain::movie::is_absent;
///
/// assert!(is_absent("N/A"));
/// assert!(is_absent("   "));
/// assert!(!is_absent("1999"));
/// ```
#[must_use]
pub fn is_absent(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == NOT_AVAILABLE
}

/// First non-absent value among `variants`, in order.
fn pick(record: &RawMovieRecord, variants: &[&str]) -> Option<String> {
    variants
        .iter()
        .filter_map(|key| record.get(key))
        .find(|value| !is_absent(value))
        .map(|value| value.trim().to_string())
}

/// Maps a raw search record into its canonical summary.
///
/// Pure and total: missing or sentinel values become `None`, never an error.
///
/// # Examples
///
/// ```
/// use reelsearch::domain::{normalize, RawMovieRecord};
///
/// let pascal = RawMovieRecord::from_pairs([("Title", "Alien"), ("Poster", "N/A")]);
/// let camel = RawMovieRecord::from_pairs([("title", "Alien"), ("poster", "")]);
///
/// assert_eq!(normalize(&pascal), normalize(&camel));
/// assert!(normalize(&pascal).poster.is_none());
/// ```
#[must_use]
pub fn normalize(record: &RawMovieRecord) -> CanonicalMovieSummary {
    CanonicalMovieSummary {
        title: pick(record, TITLE),
        year: pick(record, YEAR),
        imdb_id: pick(record, IMDB_ID),
        kind: pick(record, KIND),
        poster: pick(record, POSTER),
        imdb_rating: pick(record, IMDB_RATING),
    }
}

/// Maps a raw detail payload into the canonical detail record.
#[must_use]
pub fn normalize_details(record: &RawMovieRecord) -> CanonicalMovieDetails {
    CanonicalMovieDetails {
        summary: normalize(record),
        runtime: pick(record, RUNTIME),
        country: pick(record, COUNTRY),
        plot: pick(record, PLOT),
        director: pick(record, DIRECTOR),
        writer: pick(record, WRITER),
        actors: pick(record, ACTORS),
        genre: pick(record, GENRE),
        language: pick(record, LANGUAGE),
        rated: pick(record, RATED),
        released: pick(record, RELEASED),
        box_office: pick(record, BOX_OFFICE),
        awards: pick(record, AWARDS),
        imdb_votes: pick(record, IMDB_VOTES),
    }
}
