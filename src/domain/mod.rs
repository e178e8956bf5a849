//! Domain layer for the search synchronizer.
//!
//! Core types with no knowledge of HTTP, the event loop, or tracing export.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filter`]: URL-derived [`FilterState`]
//! - [`movie`]: Raw and canonical movie records and the normalizer
//!
//! # Examples
//!
//! ```
//! use reelsearch::domain::{normalize, FilterState, RawMovieRecord};
//!
//! let filters = FilterState::for_query("alien");
//! assert!(filters.has_query());
//!
//! let summary = normalize(&RawMovieRecord::from_pairs([("Title", "Alien")]));
//! assert_eq!(summary.title.as_deref(), Some("Alien"));
//! ```

pub mod error;
pub mod filter;
pub mod movie;

pub use error::{ReelsearchError, Result};
pub use filter::FilterState;
pub use movie::{
    normalize, normalize_details, CanonicalMovieDetails, CanonicalMovieSummary, RawMovieRecord,
};
