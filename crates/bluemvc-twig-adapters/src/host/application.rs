use std::env;
use std::path::{Path, PathBuf};

use bluemvc_twig_core::application::ports::Application;

/// An [`Application`] with a fixed list of view paths and a temp path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleApplication {
    view_paths: Vec<PathBuf>,
    temp_path: PathBuf,
}

impl SimpleApplication {
    /// No view paths; temp path is the system temp directory.
    pub fn new() -> Self {
        Self {
            view_paths: Vec::new(),
            temp_path: env::temp_dir(),
        }
    }

    /// Append a view path.
    pub fn with_view_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.view_paths.push(path.into());
        self
    }

    pub fn with_temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_path = path.into();
        self
    }

    /// Replace all view paths with `path`.
    pub fn set_view_path(&mut self, path: impl Into<PathBuf>) {
        self.view_paths = vec![path.into()];
    }

    /// The primary view path.
    pub fn view_path(&self) -> Option<&Path> {
        self.view_paths.first().map(PathBuf::as_path)
    }
}

impl Default for SimpleApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for SimpleApplication {
    fn view_paths(&self) -> Vec<PathBuf> {
        self.view_paths.clone()
    }

    fn temp_path(&self) -> PathBuf {
        self.temp_path.clone()
    }
}
