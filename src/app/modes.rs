//! Fetch lifecycle states for the search session.
//!
//! # State Machine
//!
//! ```text
//!            Navigate(q = "")                Navigate(q changed)
//!   ┌──────────────────────────┐      ┌──────────────────────────┐
//!   ▼                          │      │                          ▼
//! Idle ──Navigate(q changed)──▶ Loading ──SearchCompleted(Found)──▶ Success
//!                                 │
//!                                 └──SearchCompleted(Rejected|Failed)──▶ Error
//! ```
//!
//! Every state accepts `Navigate`: an empty query always returns to `Idle`, a
//! changed query always returns to `Loading`. Completions only move the machine
//! out of `Loading`, and only for the pending request.

use serde::{Deserialize, Serialize};

/// Current status of the search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// No query; nothing fetched and nothing pending.
    #[default]
    Idle,

    /// A request for the current query is in flight. Results are empty.
    Loading,

    /// The most recent request returned results.
    Success,

    /// The most recent request failed at the transport or application level.
    Error,
}

impl SearchStatus {
    /// Lowercase label used in logs and the CLI status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
