//! `bluemvc-twig config`: inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let serialised = render_config(&config, output.format())?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

fn render_config(config: &AppConfig, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(config).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?,
        _ => toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?,
    };
    Ok(rendered)
}
