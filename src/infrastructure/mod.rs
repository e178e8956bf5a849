//! Infrastructure layer for the environment the synchronizer runs in.
//!
//! - [`location`]: URL query string ⇄ [`FilterState`](crate::domain::FilterState) binding
//! - [`paths`]: data directory and `~` expansion

pub mod location;
pub mod paths;

pub use paths::{expand_tilde, get_data_dir};
