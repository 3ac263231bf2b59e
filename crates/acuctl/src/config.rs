//! CLI-side configuration: applies global flags on top of the loaded file
//! and builds the `ConsoleConfig` handed to core.

use std::path::PathBuf;

pub use acu_config::{Config, config_path, load_config_from, save_config_to, to_console_config};
use acu_core::ConsoleConfig;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts};
use crate::error::CliError;

/// Config file selected by `--config`, or the platform default.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config file and apply backend overrides from the command line.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&active_path(global))?;
    if let Some(ref api) = global.api {
        cfg.backend.api_base.clone_from(api);
    }
    if let Some(ref ws) = global.ws {
        cfg.backend.ws_base.clone_from(ws);
    }
    if global.timeout.is_some() {
        cfg.backend.timeout_secs = global.timeout;
    }
    Ok(cfg)
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_display_defaults(global: &mut GlobalOpts) -> Result<(), CliError> {
    if global.output.is_some() && global.color.is_some() {
        return Ok(());
    }
    let cfg = load_config_from(&active_path(global))?;
    if global.output.is_none() {
        global.output = Some(parse_choice("defaults.output", &cfg.defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_choice::<ColorMode>("defaults.color", &cfg.defaults.color)?);
    }
    Ok(())
}

fn parse_choice<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value.trim(), true).map_err(|_| {
        let expected: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value().map(|p| p.get_name().to_owned()))
            .collect();
        CliError::Validation {
            field: field.into(),
            reason: format!("unknown value {value:?}, expected one of {}", expected.join(", ")),
        }
    })
}

/// Build the runtime configuration for one invocation.
pub fn build_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = resolve(global)?;
    Ok(to_console_config(&cfg)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn parse_choice_accepts_any_case() {
        let format: OutputFormat = parse_choice("defaults.output", "JSON-Compact").unwrap();
        assert_eq!(format, OutputFormat::JsonCompact);
    }

    #[test]
    fn parse_choice_lists_valid_values() {
        let err = parse_choice::<ColorMode>("defaults.color", "sometimes").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("defaults.color"), "{msg}");
        assert!(msg.contains("auto, always, never"), "{msg}");
    }
}
