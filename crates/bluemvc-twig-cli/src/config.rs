//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the library crates never see it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by the command handlers)
//! 2. Environment variables: `BLUEMVC_TWIG__RENDERER__STRICT_VARIABLES=true`
//! 3. Config file (`--config`, or [`AppConfig::config_path`] if it exists)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use bluemvc_twig_core::domain::DEFAULT_VIEW_FILE_EXTENSION;

/// Environment variable prefix; nested keys are separated by `__` as well.
pub const ENV_PREFIX: &str = "BLUEMVC_TWIG";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub renderer: RendererConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// View file extension, without the leading dot.
    pub extension: String,
    pub strict_variables: bool,
    pub debug: bool,
    /// Overrides `<temp_path>/bluemvc-twig/cache/`.
    pub cache_dir: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_VIEW_FILE_EXTENSION.to_string(),
            strict_variables: false,
            debug: false,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Search paths used when none are passed on the command line.
    pub view_paths: Vec<PathBuf>,
    /// Defaults to the system temp directory.
    pub temp_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// A file given explicitly must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("paths.view_paths")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.bluemvc-twig.toml`
    /// in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "bluemvc", "bluemvc-twig")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".bluemvc-twig.toml"))
    }
}
