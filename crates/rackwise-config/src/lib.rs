//! Shared configuration for the rackwise tools.
//!
//! TOML settings layered with `RACKWISE_`-prefixed environment variables,
//! and translation to `rackwise_core::StoreOptions` plus the state
//! directory the store persists into.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rackwise_core::{DEFAULT_MAX_NOTIFICATIONS, DEFAULT_STORAGE_NAME, StoreOptions};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where and how the inventory is persisted.
    #[serde(default)]
    pub store: StoreSettings,

    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSettings {
    /// State directory. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// File stem of the persisted blob.
    #[serde(default = "default_storage_name")]
    pub storage_name: String,

    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,

    /// Height used when a rack is created without an explicit size.
    #[serde(default = "default_rack_units")]
    pub default_rack_units: u32,

    /// Start from the demo inventory when no state has been saved yet.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            dir: None,
            storage_name: default_storage_name(),
            max_notifications: default_max_notifications(),
            default_rack_units: default_rack_units(),
            seed_demo_data: false,
        }
    }
}

impl StoreSettings {
    /// Resolved state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_state_dir)
    }

    /// Full path of the persisted blob.
    pub fn state_file(&self) -> PathBuf {
        self.state_dir().join(format!("{}.json", self.storage_name))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_notifications: self.max_notifications,
            seed_demo: self.seed_demo_data,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.storage_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigError::Validation {
                field: "store.storage_name".into(),
                reason: "must be a non-empty file name".into(),
            });
        }
        if self.default_rack_units == 0 {
            return Err(ConfigError::Validation {
                field: "store.default_rack_units".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_storage_name() -> String {
    DEFAULT_STORAGE_NAME.into()
}
fn default_max_notifications() -> usize {
    DEFAULT_MAX_NOTIFICATIONS
}
fn default_rack_units() -> u32 {
    42
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "rackwise", "rackwise")
}

fn home_fallback(segments: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for segment in segments {
        p.push(segment);
    }
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "rackwise", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory used when `store.dir` is unset.
pub fn default_state_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "rackwise"]),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RACKWISE_").split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file + environment. A missing file yields
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.store.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.storage_name, "data-center-storage");
        assert_eq!(config.store.max_notifications, 100);
        assert_eq!(config.store.default_rack_units, 42);
        assert!(!config.store.seed_demo_data);
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.color, "auto");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
dir = "/var/lib/rackwise"
storage_name = "lab"
max_notifications = 5
seed_demo_data = true

[defaults]
output = "json"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.store.state_dir(), PathBuf::from("/var/lib/rackwise"));
        assert_eq!(
            config.store.state_file(),
            PathBuf::from("/var/lib/rackwise/lab.json")
        );
        let options = config.store.store_options();
        assert_eq!(options.max_notifications, 5);
        assert!(options.seed_demo);
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.color, "auto");
        assert_eq!(config.store.default_rack_units, 42);
    }

    #[test]
    fn invalid_storage_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nstorage_name = \"a/b\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn malformed_toml_is_a_figment_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\n").unwrap();
        assert!(matches!(
            load_config_from(&path).unwrap_err(),
            ConfigError::Figment(_)
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.store.storage_name = "inventory".into();
        config.defaults.output = "yaml".into();
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }
}
