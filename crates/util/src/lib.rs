//! Helpers shared by the Flowdash binary and TUI.

pub mod config;
pub mod date_handling;
pub mod text_processing;

pub use config::{ConfigError, ConfigOverrides, DashboardConfig, default_log_path};
pub use date_handling::format_timestamp;
pub use text_processing::{log_lines, strip_control_characters};

use std::path::PathBuf;

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs_next::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs_next::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}
