//! Reelsearch: search state synchronizer for a movie catalogue.
//!
//! Keeps a user-editable search (free text plus type and year refinements) in
//! step with three things at once:
//! - the addressable location query string, which is the single source of truth
//! - a remote search service, queried only when the search text changes
//! - a cached result set, refined locally without touching the network

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Line driver (main.rs)                              │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Cooperative loop
//! │  - Executes actions, re-dispatches locations        │
//! │  - Holds overlapping in-flight requests             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Navigate / edit / completion events              │
//! │  - Request fencing                                  │
//! │  - Local type/year refinement                       │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI hand-off   │   │ Worker Layer  │   │ Client Layer  │
//! │ (ui/)         │   │ (worker/)     │   │ (client/)     │
//! │ - View model  │   │ - Messages    │   │ - SearchApi   │
//! │ - Summaries   │   │ - Trace ctx   │   │ - reqwest     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Location query string codec (infrastructure/)    │
//! │  - Filter state, movie records, normalizer (domain/)│
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr logs, OTLP/JSON file export               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Search orchestrator with event/action model and local filtering
//! - [`client`]: Search-API contract and HTTP implementation
//! - [`domain`]: Filter state, movie records, normalizer, errors
//! - [`infrastructure`]: Location codec and filesystem paths
//! - [`runtime`]: Single-threaded driver
//! - [`ui`]: View model for presenters
//! - [`worker`]: Request/response protocol and executor
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! ```toml
//! # reelsearch.toml
//! api_url = "http://localhost:8080/api/v1"
//! request_timeout_secs = 30
//! trace_level = "debug"
//! ```
//!
//! `REELSEARCH_API_URL` and `REELSEARCH_TRACE_LEVEL` override the file.
//!
//! # Examples
//!
//! Driving the state machine directly:
//!
//! ```
//! use reelsearch::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::new();
//! let (_, actions) = handle_event(&mut state, &Event::navigate("?q=alien"))?;
//! assert_eq!(actions.len(), 1);
//!
//! // A type refinement only asks for a new location.
//! let (_, actions) = handle_event(&mut state, &Event::SetTypeFilter("movie".into()))?;
//! assert_eq!(actions, vec![Action::PushLocation("q=alien&type=movie".into())]);
//! # Ok::<(), reelsearch::ReelsearchError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, SearchStatus};
pub use domain::{ReelsearchError, Result};
pub use runtime::SearchRuntime;
pub use ui::SearchViewModel;

use crate::client::HttpSearchClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Environment variable overriding [`Config::api_url`].
pub const API_URL_ENV: &str = "REELSEARCH_API_URL";

/// Environment variable overriding [`Config::trace_level`].
pub const TRACE_LEVEL_ENV: &str = "REELSEARCH_TRACE_LEVEL";

/// Keys understood by [`Config::from_map`] and [`Config::with_map_overrides`].
const CONFIG_KEYS: &[&str] = &[
    "api_url",
    "request_timeout_secs",
    "user_agent",
    "trace_level",
    "trace_file",
    "log_to_stderr",
];

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the search backend, without the `/movies/...` suffix.
    ///
    /// Default: `http://localhost:8080/api/v1`
    pub api_url: String,

    /// Per-request timeout. Default: 30
    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// Tracing level directive (`trace`, `debug`, `info`, ...). Default: `info`
    pub trace_level: Option<String>,

    /// Trace export file. Default: `<data dir>/reelsearch-otlp.json`
    pub trace_file: Option<String>,

    /// Whether to print log lines to stderr. Default: `true`
    pub log_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout_secs: 30,
            user_agent: concat!("reelsearch/", env!("CARGO_PKG_VERSION")).to_string(),
            trace_level: None,
            trace_file: None,
            log_to_stderr: true,
        }
    }
}

impl Config {
    /// Loads a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReelsearchError::Io`] if the file cannot be read and
    /// [`ReelsearchError::Config`] if it is not valid TOML or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        config.validate()
    }

    /// Builds a configuration from string key/value pairs over the defaults.
    ///
    /// Unknown keys are ignored. Values that fail to parse fall back to their
    /// defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use reelsearch::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://movies.example/api/v1".to_string());
    /// map.insert("request_timeout_secs".to_string(), "10".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_url, "https://movies.example/api/v1");
    /// assert_eq!(config.request_timeout_secs, 10);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_map_overrides(map)
    }

    /// Replaces the values named in `map`, keeping everything else.
    ///
    /// This is how `key=value` command-line arguments are applied on top of a
    /// config file. Values that fail to parse leave the current value alone.
    #[must_use]
    pub fn with_map_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        if let Some(url) = text("api_url") {
            self.api_url = url;
        }
        if let Some(secs) = text("request_timeout_secs")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            self.request_timeout_secs = secs;
        }
        if let Some(agent) = text("user_agent") {
            self.user_agent = agent;
        }
        if let Some(level) = text("trace_level") {
            self.trace_level = Some(level);
        }
        if let Some(file) = text("trace_file") {
            self.trace_file = Some(file);
        }
        if let Some(flag) = text("log_to_stderr").and_then(|v| v.parse().ok()) {
            self.log_to_stderr = flag;
        }

        for key in map.keys().filter(|key| !CONFIG_KEYS.contains(&key.as_str())) {
            tracing::warn!(key = %key, "ignoring unknown configuration key");
        }
        self
    }

    /// Applies `REELSEARCH_API_URL` and `REELSEARCH_TRACE_LEVEL`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(API_URL_ENV) {
            self.api_url = url.trim().to_string();
        }
        if let Some(level) = lookup(TRACE_LEVEL_ENV) {
            self.trace_level = Some(level.trim().to_string());
        }
        self
    }

    /// Checks values that would otherwise fail on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ReelsearchError::Config`] for a non-HTTP `api_url` or a zero
    /// timeout.
    pub fn validate(self) -> Result<Self> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReelsearchError::Config(format!(
                "api_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ReelsearchError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Creates a runtime backed by the HTTP search client.
///
/// # Errors
///
/// Returns [`ReelsearchError::Config`] if the configuration is invalid or the
/// HTTP client cannot be built.
///
/// # Example
///
/// ```
/// use reelsearch::{initialize, Config};
///
/// let runtime = initialize(&Config::default())?;
/// assert_eq!(runtime.in_flight(), 0);
/// # Ok::<(), reelsearch::ReelsearchError>(())
/// ```
pub fn initialize(config: &Config) -> Result<SearchRuntime> {
    let config = config.clone().validate()?;
    tracing::debug!(api_url = %config.api_url, timeout_secs = config.request_timeout_secs, "initializing search runtime");

    let client = HttpSearchClient::new(&config)?;
    Ok(SearchRuntime::new(Arc::new(client)))
}
