//! Template loader adapters.
//!
//! Both loaders resolve a template name against an ordered list of search
//! paths; the first path containing the name wins.

mod filesystem;
mod memory;

use std::path::{Path, PathBuf};

use bluemvc_twig_core::{
    application::{TemplateError, TemplateErrorKind},
    error::ViewError,
};

pub use filesystem::FilesystemLoader;
pub use memory::MemoryLoader;

/// Turn a template name into a path relative to a search path.
///
/// Rejects empty names, absolute names and any `..` segment.
fn relative_template_path(name: &str) -> Result<PathBuf, TemplateError> {
    let outside = || {
        TemplateError::new(
            TemplateErrorKind::NotFound,
            format!("Looks like you try to load a template outside configured directories ({name})."),
        )
        .with_name(name)
    };

    if name.starts_with(['/', '\\']) || Path::new(name).is_absolute() {
        return Err(outside());
    }

    let mut relative = PathBuf::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(outside()),
            segment => relative.push(segment),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(TemplateError::new(TemplateErrorKind::NotFound, "Template name is empty"));
    }
    Ok(relative)
}

/// Search paths are stored without trailing separators.
fn normalize_search_path(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(raw) => {
            let trimmed = raw.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() || trimmed.len() == raw.len() {
                path
            } else {
                PathBuf::from(trimmed)
            }
        }
        None => path,
    }
}

fn not_found(name: &str, paths: &[PathBuf]) -> ViewError {
    let message = if paths.is_empty() {
        format!("Unable to find template \"{name}\" (no view paths are registered).")
    } else {
        let looked_into = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Unable to find template \"{name}\" (looked into: {looked_into}).")
    };
    TemplateError::new(TemplateErrorKind::NotFound, message)
        .with_name(name)
        .into()
}

/// Template name for a file below `root`, with `/` separators.
fn template_name(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}
