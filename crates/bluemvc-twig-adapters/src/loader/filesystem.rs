//! Filesystem template loader.

use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

use bluemvc_twig_core::{
    application::{ApplicationError, TemplateError, TemplateErrorKind, ports::TemplateLoader},
    domain::ViewFileExtension,
    error::ViewResult,
};

use super::{normalize_search_path, not_found, relative_template_path, template_name};

/// Loads templates from an ordered list of directories.
///
/// Starts unconfigured: no search paths until [`TemplateLoader::set_paths`]
/// or one of the add methods is called.
#[derive(Debug, Default)]
pub struct FilesystemLoader {
    state: RwLock<LoaderState>,
}

#[derive(Debug, Default)]
struct LoaderState {
    paths: Option<Vec<PathBuf>>,
    revision: u64,
}

impl FilesystemLoader {
    /// Create an unconfigured loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with `paths` already configured.
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths = paths
            .into_iter()
            .map(|p| normalize_search_path(p.into()))
            .collect();
        Self {
            state: RwLock::new(LoaderState {
                paths: Some(paths),
                revision: 1,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LoaderState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> ViewResult<RwLockWriteGuard<'_, LoaderState>> {
        self.state.write().map_err(|_| {
            ApplicationError::LockPoisoned {
                resource: "template loader",
            }
            .into()
        })
    }

    fn update(&self, change: impl FnOnce(&mut Vec<PathBuf>)) -> ViewResult<()> {
        let mut state = self.write()?;
        change(state.paths.get_or_insert_with(Vec::new));
        state.revision += 1;
        Ok(())
    }
}

impl TemplateLoader for FilesystemLoader {
    fn paths(&self) -> Vec<PathBuf> {
        self.read().paths.clone().unwrap_or_default()
    }

    fn is_configured(&self) -> bool {
        self.read().paths.is_some()
    }

    fn set_paths(&self, paths: Vec<PathBuf>) -> ViewResult<()> {
        let paths: Vec<PathBuf> = paths.into_iter().map(normalize_search_path).collect();
        debug!(?paths, "Setting view search paths");
        self.update(|current| *current = paths)
    }

    fn add_path(&self, path: PathBuf) -> ViewResult<()> {
        self.update(|current| current.push(normalize_search_path(path)))
    }

    fn prepend_path(&self, path: PathBuf) -> ViewResult<()> {
        self.update(|current| current.insert(0, normalize_search_path(path)))
    }

    fn revision(&self) -> u64 {
        self.read().revision
    }

    #[instrument(level = "trace", skip(self))]
    fn resolve(&self, name: &str) -> ViewResult<PathBuf> {
        let relative = relative_template_path(name)?;
        let paths = self.paths();

        for dir in &paths {
            let candidate = dir.join(&relative);
            if candidate.is_file() {
                trace!(path = %candidate.display(), "Template resolved");
                return Ok(candidate);
            }
        }

        Err(not_found(name, &paths))
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    fn load_source(&self, name: &str) -> ViewResult<String> {
        let path = self.resolve(name)?;
        fs::read_to_string(&path).map_err(|e| {
            TemplateError::new(
                TemplateErrorKind::Io,
                format!("Failed to read {}: {}", path.display(), e),
            )
            .with_name(name)
            .into()
        })
    }

    fn is_fresh(&self, name: &str, time: SystemTime) -> bool {
        self.resolve(name)
            .ok()
            .and_then(|path| fs::metadata(path).ok())
            .and_then(|meta| meta.modified().ok())
            .is_some_and(|modified| modified <= time)
    }

    fn list_templates(&self, extension: &ViewFileExtension) -> ViewResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for dir in self.paths() {
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "Skipping missing view path");
                continue;
            }

            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    TemplateError::new(
                        TemplateErrorKind::Io,
                        format!("Failed to walk {}: {}", dir.display(), e),
                    )
                })?;

                if !entry.file_type().is_file() || !extension.matches(entry.path()) {
                    continue;
                }

                // Earlier search paths shadow later ones.
                if let Some(name) = template_name(&dir, entry.path()) {
                    if seen.insert(name.clone()) {
                        names.push(name);
                    }
                }
            }
        }

        Ok(names)
    }
}
