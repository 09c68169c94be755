//! Dashboard configuration.
//!
//! Values are resolved with the precedence command-line flag, then the
//! `FLOWDASH_API_BASE` environment variable, then the optional JSON file at
//! `~/.config/flowdash/config.json`, then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, data_dir};
use flowdash_types::DetailFetchMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::expand_tilde;

/// Environment variable carrying the API base URL.
pub const API_BASE_ENV: &str = "FLOWDASH_API_BASE";

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "FLOWDASH_CONFIG_PATH";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Path of the sign-out endpoint, relative to the API origin.
pub const SIGN_OUT_PATH: &str = "/oauth2/sign_out";

/// Environment variable overriding where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "FLOWDASH_LOG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error surfaced when the configuration file cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown theme '{0}' (expected 'dracula' or 'nord')")]
    UnknownTheme(String),
}

/// Shape of the optional JSON file. Every field may be omitted.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub split_jobs: Option<bool>,
    pub theme: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub split_jobs: bool,
}

/// Fully resolved configuration handed to the API client and the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base: String,
    pub detail_fetch: DetailFetchMode,
    /// Canonical theme id, `dracula` or `nord`.
    pub theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            detail_fetch: DetailFetchMode::Combined,
            theme: "dracula".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load the config file from its default location and apply overrides.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let path = default_config_path();
        let file = read_config_file(&path)?;
        Self::resolve(file, env::var(API_BASE_ENV).ok(), overrides)
    }

    /// Merge the layers in precedence order.
    pub fn resolve(file: ConfigFile, env_api_base: Option<String>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let api_base = [overrides.api_base.clone(), env_api_base, file.api_base]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let detail_fetch = if overrides.split_jobs || file.split_jobs.unwrap_or(false) {
            DetailFetchMode::Split
        } else {
            DetailFetchMode::Combined
        };

        let theme = match file.theme.as_deref().map(|theme| theme.trim().to_ascii_lowercase()) {
            None => "dracula".to_string(),
            Some(theme) if theme == "dracula" || theme == "nord" => theme,
            Some(other) => return Err(ConfigError::UnknownTheme(other)),
        };

        Ok(Self {
            api_base,
            detail_fetch,
            theme,
        })
    }

    /// Sign-out link shown in the header: the API origin joined with
    /// [`SIGN_OUT_PATH`]. Falls back to the bare path when the base does not
    /// parse.
    pub fn sign_out_url(&self) -> String {
        Url::parse(&self.api_base)
            .and_then(|base| base.join(SIGN_OUT_PATH))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| SIGN_OUT_PATH.to_string())
    }
}

/// Location of the config file, honoring [`CONFIG_PATH_ENV`].
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("flowdash").join(CONFIG_FILE_NAME)
}

/// Log file used while the TUI owns the terminal, honoring [`LOG_PATH_ENV`].
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    data_dir().unwrap_or_else(|| PathBuf::from(".")).join("flowdash").join("flowdash.log")
}

/// Read the file at `path`. A missing file yields defaults.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(ConfigFile::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn flag_beats_env_beats_file() {
        let file = ConfigFile {
            api_base: Some("http://file:1/api".into()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            api_base: Some("http://flag:1/api".into()),
            split_jobs: false,
        };
        let config = DashboardConfig::resolve(file.clone(), Some("http://env:1/api".into()), &overrides).expect("config");
        assert_eq!(config.api_base, "http://flag:1/api");

        let config = DashboardConfig::resolve(file.clone(), Some("http://env:1/api".into()), &ConfigOverrides::default()).expect("config");
        assert_eq!(config.api_base, "http://env:1/api");

        let config = DashboardConfig::resolve(file, None, &ConfigOverrides::default()).expect("config");
        assert_eq!(config.api_base, "http://file:1/api");
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = DashboardConfig::resolve(ConfigFile::default(), Some("   ".into()), &ConfigOverrides::default()).expect("config");
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn split_jobs_from_flag_or_file() {
        let file = ConfigFile {
            split_jobs: Some(true),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(file, None, &ConfigOverrides::default()).expect("config");
        assert_eq!(config.detail_fetch, DetailFetchMode::Split);

        let overrides = ConfigOverrides {
            api_base: None,
            split_jobs: true,
        };
        let config = DashboardConfig::resolve(ConfigFile::default(), None, &overrides).expect("config");
        assert_eq!(config.detail_fetch, DetailFetchMode::Split);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let file = ConfigFile {
            theme: Some("Solarized".into()),
            ..Default::default()
        };
        let error = DashboardConfig::resolve(file, None, &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownTheme(theme) if theme == "solarized"));
    }

    #[test]
    fn sign_out_url_uses_api_origin() {
        let config = DashboardConfig {
            api_base: "https://flows.example.com/api".into(),
            ..Default::default()
        };
        assert_eq!(config.sign_out_url(), "https://flows.example.com/oauth2/sign_out");
    }

    #[test]
    fn config_file_is_read_and_missing_file_is_default() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"api_base": "http://remote:9000/api", "theme": "nord"}}"#).expect("write");
        let parsed = read_config_file(file.path()).expect("parse");
        assert_eq!(parsed.api_base.as_deref(), Some("http://remote:9000/api"));
        assert_eq!(parsed.theme.as_deref(), Some("nord"));

        let dir = tempfile::tempdir().expect("temp dir");
        let missing = read_config_file(&dir.path().join("absent.json")).expect("missing is fine");
        assert_eq!(missing, ConfigFile::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write");
        assert!(matches!(read_config_file(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn config_path_env_override_is_honored() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/flowdash-test/config.json"), || {
            assert_eq!(default_config_path(), PathBuf::from("/tmp/flowdash-test/config.json"));
        });
    }

    #[test]
    fn log_path_env_override_is_honored() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/flowdash-test/dash.log"), || {
            assert_eq!(default_log_path(), PathBuf::from("/tmp/flowdash-test/dash.log"));
        });
        temp_env::with_var_unset(LOG_PATH_ENV, || {
            assert!(default_log_path().ends_with("flowdash/flowdash.log"));
        });
    }

    #[test]
    fn load_reads_env_base() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"split_jobs": true}"#).expect("write");
        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_string_lossy().into_owned())),
                (API_BASE_ENV, Some("http://env-host:7000/api".to_string())),
            ],
            || {
                let config = DashboardConfig::load(&ConfigOverrides::default()).expect("load");
                assert_eq!(config.api_base, "http://env-host:7000/api");
                assert_eq!(config.detail_fetch, DetailFetchMode::Split);
            },
        );
    }
}
