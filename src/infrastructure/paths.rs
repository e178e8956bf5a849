//! Filesystem locations for configuration and trace output.
//!
//! Paths are resolved from the environment rather than hardcoded so the same
//! binary works for a developer checkout and an installed copy.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "REELSEARCH_DATA_DIR";

/// Returns the data directory for trace files.
///
/// Resolution order:
/// 1. `$REELSEARCH_DATA_DIR`
/// 2. `$XDG_DATA_HOME/reelsearch`
/// 3. `$HOME/.local/share/reelsearch`
/// 4. `<temp dir>/reelsearch`
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = non_empty_env(DATA_DIR_ENV) {
        return PathBuf::from(expand_tilde(&dir));
    }
    if let Some(xdg) = non_empty_env("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("reelsearch");
    }
    non_empty_env("HOME").map_or_else(
        || std::env::temp_dir().join("reelsearch"),
        |home| PathBuf::from(home).join(".local").join("share").join("reelsearch"),
    )
}

/// Expands a leading `~` to `$HOME`.
///
/// Paths without a leading tilde, or any path when `$HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use reelsearch::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/path"), "relative/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = non_empty_env("HOME") else {
        return path.to_string();
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
