//! Config subcommand handlers.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use rackwise_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

const OUTPUT_CHOICES: [&str; 4] = ["table", "json", "yaml", "plain"];

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for the handful of settings worth choosing up front.
fn wizard(mut cfg: Config) -> Result<Config, CliError> {
    let state_dir: String = Input::new()
        .with_prompt("State directory")
        .default(cfg.store.state_dir().display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.store.dir = Some(PathBuf::from(state_dir));

    cfg.store.default_rack_units = Input::new()
        .with_prompt("Default rack height (U)")
        .default(cfg.store.default_rack_units)
        .interact_text()
        .map_err(prompt_err)?;

    cfg.store.seed_demo_data = Confirm::new()
        .with_prompt("Seed demo data when no inventory exists?")
        .default(cfg.store.seed_demo_data)
        .interact()
        .map_err(prompt_err)?;

    let selection = Select::new()
        .with_prompt("Default output format")
        .items(&OUTPUT_CHOICES)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    cfg.defaults.output = OUTPUT_CHOICES
        .get(selection)
        .copied()
        .unwrap_or("table")
        .into();

    Ok(cfg)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_file(global);
            if path.exists() {
                let prompt = format!("Overwrite {}?", path.display());
                if !util::confirm("config init", &prompt, global.yes)? {
                    return Ok(());
                }
            }

            let mut cfg = Config::default();
            if let Some(dir) = &global.state_dir {
                cfg.store.dir = Some(dir.clone());
            }
            // --yes or no terminal: write defaults without prompting
            let cfg = if global.yes || !std::io::stdin().is_terminal() {
                cfg
            } else {
                wizard(cfg)?
            };
            cfg.store.validate()?;
            rackwise_config::save_config_to(&cfg, &path)?;
            output::print_status(
                &format!("Configuration written to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                global.output.unwrap_or(OutputFormat::Table),
                &cfg,
                |_| rendered.trim_end().to_owned(),
                |_| rendered.trim_end().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::config_file(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
