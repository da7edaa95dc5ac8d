//! CLI-side view of the shared configuration: flag overrides, output
//! resolution, and opening the file-backed store.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::debug;

use rackwise_config::{Config, StoreSettings};
use rackwise_core::{InventoryStore, JsonFileBackend};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Flags and config merged into what command handlers need.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    pub store: StoreSettings,
}

impl Context {
    /// Build from parsed flags over a loaded config. Flags win.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let output = match global.output {
            Some(format) => format,
            None => parse_choice::<OutputFormat>("defaults.output", &cfg.defaults.output)?,
        };
        let color = match global.color {
            Some(mode) => mode,
            None => parse_choice::<ColorMode>("defaults.color", &cfg.defaults.color)?,
        };

        let mut store = cfg.store.clone();
        if let Some(dir) = &global.state_dir {
            store.dir = Some(dir.clone());
        }

        Ok(Self {
            output,
            color: output::should_color(color),
            quiet: global.quiet,
            yes: global.yes,
            store,
        })
    }

    /// Open the JSON-file store under the resolved state directory.
    pub fn open_store(&self) -> Result<InventoryStore, CliError> {
        let dir = self.store.state_dir();
        debug!(dir = %dir.display(), name = %self.store.storage_name, "opening inventory");
        let backend = JsonFileBackend::new(&dir, &self.store.storage_name);
        Ok(InventoryStore::open(backend, self.store.store_options())?)
    }
}

fn parse_choice<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::validation(field, reason))
}

/// Config file in effect: `--config` / `RACKWISE_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(rackwise_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(rackwise_config::load_config_from(&config_file(global))?)
}
