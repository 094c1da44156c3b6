//! Runtime configuration backed by a RON file, with environment overrides.
//!
//! Precedence (lowest first): defaults, config file, environment, then
//! whatever the caller (CLI flags, web form) applies on top.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::NoteGenError;
use crate::notes::file_ops::atomic_write;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const API_URL: &str = "API_URL";
    pub const NOTES_DIR: &str = "NOTES_DIR";
    /// Seconds between the metadata call and the body call
    pub const DELAY_BETWEEN_CALLS_SECONDS: &str = "DELAY_BETWEEN_CALLS_SECONDS";
    /// Seconds between successive subjects of a batch
    pub const PER_REQUEST_DELAY_SECONDS: &str = "PER_REQUEST_DELAY_SECONDS";
    pub const REQUEST_TIMEOUT_SECONDS: &str = "REQUEST_TIMEOUT_SECONDS";
    /// "true"/"1" keeps a batch going after a failed subject
    pub const CONTINUE_ON_ERROR: &str = "CONTINUE_ON_ERROR";
    /// Override for the config file location
    pub const CONFIG_PATH: &str = "NOTEGEN_CONFIG";
    pub const HOME: &str = "HOME";
}

/// Default values
pub mod defaults {
    pub const API_URL: &str = "http://192.168.50.4:8787/infer";
    pub const NOTES_DIR: &str = "~/Notes";
    pub const DELAY_META_CONTENT_SECS: u64 = 30;
    pub const DELAY_BETWEEN_ROWS_SECS: u64 = 120;
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const CONFIG_PATH: &str = "~/.config/notegen/config.ron";
}

/// Expand a leading `~` using `$HOME`. Paths without `~` are returned as-is.
pub fn expand_home(path: &str) -> PathBuf {
    let home = env::var(env_vars::HOME).ok();
    expand_home_with(path, home.as_deref())
}

fn expand_home_with(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            PathBuf::from(format!("{}{}", home.trim_end_matches('/'), rest))
        }
        _ => PathBuf::from(path),
    }
}

/// Location of the config file (`$NOTEGEN_CONFIG` or the default under `~/.config`)
pub fn config_path() -> PathBuf {
    match env::var(env_vars::CONFIG_PATH) {
        Ok(p) if !p.trim().is_empty() => expand_home(p.trim()),
        _ => expand_home(defaults::CONFIG_PATH),
    }
}

/// Pauses applied around inference calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Between the metadata call and the body call of one subject
    pub meta_to_content_secs: u64,
    /// Between successive subjects of a batch
    pub between_rows_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGenConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// May start with `~`
    #[serde(default = "default_notes_dir")]
    pub notes_dir: String,
    #[serde(default = "default_delay_meta_content")]
    pub delay_meta_content_secs: u64,
    #[serde(default = "default_delay_between_rows")]
    pub delay_between_rows_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Keep processing a batch after one subject fails
    #[serde(default)]
    pub continue_on_error: bool,
}

fn default_api_url() -> String {
    defaults::API_URL.to_string()
}

fn default_notes_dir() -> String {
    defaults::NOTES_DIR.to_string()
}

fn default_delay_meta_content() -> u64 {
    defaults::DELAY_META_CONTENT_SECS
}

fn default_delay_between_rows() -> u64 {
    defaults::DELAY_BETWEEN_ROWS_SECS
}

fn default_request_timeout() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

impl Default for NoteGenConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            notes_dir: default_notes_dir(),
            delay_meta_content_secs: defaults::DELAY_META_CONTENT_SECS,
            delay_between_rows_secs: defaults::DELAY_BETWEEN_ROWS_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            continue_on_error: false,
        }
    }
}

impl NoteGenConfig {
    /// Config file merged with environment overrides
    pub fn from_env() -> Self {
        Self::load().apply_overrides(|key| env::var(key).ok())
    }

    /// Load from the default config path, falling back to `Default` on any error.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match ron::from_str::<NoteGenConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse {:?}: {}; using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::debug!("Could not read {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty RON and write to the default config path.
    pub fn save(&self) -> Result<(), NoteGenError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), NoteGenError> {
        let pretty = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| NoteGenError::Config(format!("Failed to serialize config: {}", e)))?;
        atomic_write(path, &content).map_err(|source| NoteGenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Apply overrides looked up by environment variable name. Blank values
    /// are ignored; unparsable numbers are logged and ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let seconds = |key: &str| parse_secs(key, get(key));

        if let Some(url) = get(env_vars::API_URL) {
            self.api_url = url;
        }
        if let Some(dir) = get(env_vars::NOTES_DIR) {
            self.notes_dir = dir;
        }
        if let Some(secs) = seconds(env_vars::DELAY_BETWEEN_CALLS_SECONDS) {
            self.delay_meta_content_secs = secs;
        }
        if let Some(secs) = seconds(env_vars::PER_REQUEST_DELAY_SECONDS) {
            self.delay_between_rows_secs = secs;
        }
        if let Some(secs) = seconds(env_vars::REQUEST_TIMEOUT_SECONDS) {
            self.request_timeout_secs = secs;
        }
        if let Some(flag) = get(env_vars::CONTINUE_ON_ERROR) {
            self.continue_on_error = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Notes directory with `~` expanded
    pub fn notes_path(&self) -> PathBuf {
        expand_home(&self.notes_dir)
    }

    pub fn delays(&self) -> Delays {
        Delays {
            meta_to_content_secs: self.delay_meta_content_secs,
            between_rows_secs: self.delay_between_rows_secs,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_secs(key: &str, value: Option<String>) -> Option<u64> {
    let value = value?;
    match value.parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            log::warn!("Ignoring {}={:?}: {}", key, value, e);
            None
        }
    }
}
