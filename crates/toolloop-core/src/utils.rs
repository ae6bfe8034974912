//! Utility helpers: data directory resolution and string shaping.

use std::path::PathBuf;

/// Get the Toolloop data directory (e.g. `~/.toolloop/`).
pub fn get_data_path() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".toolloop")
}

/// Get the REPL history directory (e.g. `~/.toolloop/history/`).
pub fn get_history_path() -> PathBuf {
    get_data_path().join("history")
}

/// Get the default workspace path (e.g. `~/.toolloop/workspace/`).
pub fn get_default_workspace_path() -> PathBuf {
    get_data_path().join("workspace")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}
