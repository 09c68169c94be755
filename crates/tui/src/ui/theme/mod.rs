//! Theme styling module for the TUI UI layer.
//!
//! Two palettes are available (Dracula, the default, and Nord). Components
//! style themselves through semantic [`roles::ThemeRoles`] and the builders in
//! [`theme_helpers`] instead of hard-coding colors.

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Selects a theme by the canonical id from `DashboardConfig::theme`.
///
/// Configuration loading already rejects unknown ids.
pub fn load(theme_id: &str) -> Box<dyn Theme> {
    match theme_id {
        "nord" => Box::new(NordTheme::new()),
        "dracula" => Box::new(DraculaTheme::new()),
        other => {
            debug!(theme = other, "unknown theme id; falling back to dracula");
            Box::new(DraculaTheme::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_theme_is_the_only_source() {
        temp_env::with_var("FLOWDASH_THEME", Some("nord"), || {
            assert_eq!(load("dracula").roles().background, dracula::BG);
        });
        assert_eq!(load("nord").roles().background, nord::N0);
    }
}
