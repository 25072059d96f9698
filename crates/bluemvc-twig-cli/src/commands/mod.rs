//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod list;
pub mod render;

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Search paths for a command: flags first, then config, then the current
/// directory. Every path must be an existing directory.
fn resolve_view_paths(from_flags: &[PathBuf], config: &AppConfig) -> CliResult<Vec<PathBuf>> {
    let paths = if !from_flags.is_empty() {
        from_flags.to_vec()
    } else if !config.paths.view_paths.is_empty() {
        config.paths.view_paths.clone()
    } else {
        vec![env::current_dir()?]
    };

    if let Some(missing) = paths.iter().find(|p| !p.is_dir()) {
        return Err(CliError::ViewPathNotFound {
            path: missing.clone(),
        });
    }

    debug!(?paths, "View paths resolved");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flags_win_over_config() {
        let flag = TempDir::new().unwrap();
        let configured = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.view_paths = vec![configured.path().to_path_buf()];

        let paths = resolve_view_paths(&[flag.path().to_path_buf()], &config).unwrap();

        assert_eq!(paths, vec![flag.path().to_path_buf()]);
    }

    #[test]
    fn config_used_without_flags() {
        let configured = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.view_paths = vec![configured.path().to_path_buf()];

        let paths = resolve_view_paths(&[], &config).unwrap();

        assert_eq!(paths, vec![configured.path().to_path_buf()]);
    }

    #[test]
    fn missing_directory_is_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = resolve_view_paths(&[missing.clone()], &AppConfig::default()).unwrap_err();

        assert!(matches!(err, CliError::ViewPathNotFound { path } if path == missing));
    }
}
