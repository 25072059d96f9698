//! `bluemvc-twig list`: the views a set of search paths exposes.

use bluemvc_twig_adapters::FilesystemLoader;
use bluemvc_twig_core::{
    application::ports::TemplateLoader, domain::ViewFileExtension, error::ViewError,
};

use super::resolve_view_paths;
use crate::{
    cli::{ListArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let extension = args
        .extension
        .as_deref()
        .unwrap_or(&config.renderer.extension);
    let extension = ViewFileExtension::parse(extension).map_err(ViewError::from)?;

    let loader = FilesystemLoader::with_paths(resolve_view_paths(&args.view_paths, &config)?);
    let views = loader.list_templates(&extension)?;

    match output.format() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&views).map_err(|e| CliError::InvalidInput {
                message: "Failed to serialise view list".into(),
                source: Some(Box::new(e)),
            })?;
            output.document(&format!("{json}\n"))?;
        }
        OutputFormat::Human => {
            if views.is_empty() {
                output.info(&format!("No .{extension} views found"))?;
            } else {
                output.header(&format!("Available views (.{extension}):"))?;
                for view in &views {
                    output.print(&format!("  {view}"))?;
                }
            }
        }
        OutputFormat::Plain | OutputFormat::Auto => {
            for view in &views {
                output.print(view)?;
            }
        }
    }

    Ok(())
}
