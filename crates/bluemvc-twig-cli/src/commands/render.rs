//! `bluemvc-twig render`: render one view to stdout.

use std::fs;

use tracing::{info, instrument};

use bluemvc_twig_adapters::{SimpleApplication, SimpleRequest, TwigViewRenderer};
use bluemvc_twig_core::{
    application::ports::{TemplateEngine, ViewRenderer},
    domain::{CacheLocation, Model, ViewFile, ViewFileExtension, ViewItemCollection},
    error::ViewError,
};

use super::resolve_view_paths;
use crate::{
    cli::RenderArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(view = %args.view))]
pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let extension = args
        .extension
        .as_deref()
        .unwrap_or(&config.renderer.extension);
    let extension = ViewFileExtension::parse(extension).map_err(ViewError::from)?;
    let view = ViewFile::new(&args.view).map_err(ViewError::from)?;

    let renderer = TwigViewRenderer::new(extension);
    if !renderer.claims(view.as_path()) {
        return Err(CliError::InvalidInput {
            message: format!(
                "'{}' does not have the .{} extension",
                args.view,
                renderer.view_file_extension()
            ),
            source: None,
        });
    }

    renderer
        .set_strict_variables(
            args.strict_variables()
                .unwrap_or(config.renderer.strict_variables),
        )?
        .set_debug(args.debug_mode().unwrap_or(config.renderer.debug))?;
    if let Some(dir) = args.cache_dir.clone().or_else(|| config.renderer.cache_dir.clone()) {
        renderer
            .twig_environment()
            .set_cache(CacheLocation::directory(dir))?;
    }

    let application = application(&args, &config)?;
    let request = SimpleRequest::new(args.url.as_str()).with_method(args.method.as_str());
    let model = load_model(&args)?;
    let items: ViewItemCollection = args.items.iter().cloned().collect();

    let html = renderer.render_view(&application, &request, &view, model.as_ref(), Some(&items))?;
    info!(bytes = html.len(), "View rendered");

    output.document(&html)?;
    Ok(())
}

fn application(args: &RenderArgs, config: &AppConfig) -> CliResult<SimpleApplication> {
    let mut application = SimpleApplication::new();
    for path in resolve_view_paths(&args.view_paths, config)? {
        application = application.with_view_path(path);
    }
    if let Some(temp) = args.temp_path.as_ref().or(config.paths.temp_path.as_ref()) {
        application = application.with_temp_path(temp);
    }
    Ok(application)
}

fn load_model(args: &RenderArgs) -> CliResult<Option<Model>> {
    if let Some(value) = &args.model {
        return Ok(Some(Model::new(value.clone())));
    }

    let Some(path) = &args.model_file else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read model file {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| CliError::InvalidInput {
            message: format!("{} is not valid JSON", path.display()),
            source: Some(Box::new(e)),
        })?;
    Ok(Some(Model::new(value)))
}
