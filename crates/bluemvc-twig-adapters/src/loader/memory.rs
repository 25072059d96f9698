//! In-memory template loader for testing and embedded views.

use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use tracing::trace;

use bluemvc_twig_core::{
    application::{ApplicationError, ports::TemplateLoader},
    domain::ViewFileExtension,
    error::ViewResult,
};

use super::{normalize_search_path, not_found, relative_template_path, template_name};

/// Template loader over an in-memory file tree.
///
/// Files are stored under full paths and resolved against the search paths
/// exactly like [`super::FilesystemLoader`] resolves them on disk. Clones
/// share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    paths: Option<Vec<PathBuf>>,
    files: BTreeMap<PathBuf, MemoryFile>,
    revision: u64,
}

#[derive(Debug, Clone)]
struct MemoryFile {
    source: String,
    modified: SystemTime,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `source` at `path`, replacing any previous content.
    pub fn add_file(&self, path: impl Into<PathBuf>, source: impl Into<String>) -> ViewResult<()> {
        let mut state = self.write()?;
        state.files.insert(
            path.into(),
            MemoryFile {
                source: source.into(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    /// Remove the file at `path`. Returns `true` if it existed.
    pub fn remove_file(&self, path: impl Into<PathBuf>) -> ViewResult<bool> {
        let mut state = self.write()?;
        Ok(state.files.remove(&path.into()).is_some())
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> ViewResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|_| {
            ApplicationError::LockPoisoned {
                resource: "memory loader",
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

    fn lookup(&self, name: &str) -> ViewResult<(PathBuf, MemoryFile)> {
        let relative = relative_template_path(name)?;
        let state = self.read();
        let paths = state.paths.as_deref().unwrap_or_default();

        for dir in paths {
            let candidate = dir.join(&relative);
            if let Some(file) = state.files.get(&candidate) {
                trace!(path = %candidate.display(), "Template resolved in memory");
                return Ok((candidate, file.clone()));
            }
        }

        Err(not_found(name, paths))
    }
}

impl TemplateLoader for MemoryLoader {
    fn paths(&self) -> Vec<PathBuf> {
        self.read().paths.clone().unwrap_or_default()
    }

    fn is_configured(&self) -> bool {
        self.read().paths.is_some()
    }

    fn set_paths(&self, paths: Vec<PathBuf>) -> ViewResult<()> {
        let paths: Vec<PathBuf> = paths.into_iter().map(normalize_search_path).collect();
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

    fn resolve(&self, name: &str) -> ViewResult<PathBuf> {
        self.lookup(name).map(|(path, _)| path)
    }

    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    fn load_source(&self, name: &str) -> ViewResult<String> {
        self.lookup(name).map(|(_, file)| file.source)
    }

    fn is_fresh(&self, name: &str, time: SystemTime) -> bool {
        self.lookup(name)
            .is_ok_and(|(_, file)| file.modified <= time)
    }

    fn list_templates(&self, extension: &ViewFileExtension) -> ViewResult<Vec<String>> {
        let state = self.read();
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for dir in state.paths.as_deref().unwrap_or_default() {
            for path in state.files.keys().filter(|p| extension.matches(p)) {
                if let Some(name) = template_name(dir, path) {
                    if seen.insert(name.clone()) {
                        names.push(name);
                    }
                }
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn loader() -> MemoryLoader {
        let loader = MemoryLoader::new();
        loader.add_file("views/page.twig", "primary").unwrap();
        loader.add_file("views/partials/nav.twig", "nav").unwrap();
        loader.add_file("alt/page.twig", "secondary").unwrap();
        loader.add_file("alt/only.twig", "only").unwrap();
        loader.add_file("alt/readme.md", "docs").unwrap();
        loader
    }

    #[test]
    fn unconfigured_until_paths_are_set() {
        let loader = loader();
        assert!(!loader.is_configured());
        assert!(!loader.exists("page.twig"));

        loader.set_paths(vec![PathBuf::from("views")]).unwrap();

        assert!(loader.is_configured());
        assert_eq!(loader.load_source("page.twig").unwrap(), "primary");
    }

    #[test]
    fn search_order_decides_which_file_loads() {
        let loader = loader();
        loader
            .set_paths(vec![PathBuf::from("alt/"), PathBuf::from("views")])
            .unwrap();

        assert_eq!(loader.load_source("page.twig").unwrap(), "secondary");
        assert_eq!(
            loader.resolve("partials/nav.twig").unwrap(),
            PathBuf::from("views/partials/nav.twig")
        );
    }

    #[test]
    fn clones_share_files_and_paths() {
        let loader = loader();
        let other = loader.clone();

        other.add_path(PathBuf::from("views")).unwrap();
        other.add_file("views/new.twig", "new").unwrap();

        assert_eq!(loader.load_source("new.twig").unwrap(), "new");
    }

    #[test]
    fn rewritten_file_is_no_longer_fresh() {
        let loader = loader();
        loader.set_paths(vec![PathBuf::from("views")]).unwrap();
        let loaded_at = SystemTime::now() - Duration::from_secs(1);

        loader.add_file("views/page.twig", "changed").unwrap();

        assert!(!loader.is_fresh("page.twig", loaded_at));
        assert!(loader.is_fresh("page.twig", SystemTime::now()));
    }

    #[test]
    fn removed_file_is_not_found() {
        let loader = loader();
        loader.set_paths(vec![PathBuf::from("alt")]).unwrap();

        assert!(loader.remove_file("alt/only.twig").unwrap());

        assert!(loader.load_source("only.twig").unwrap_err().is_template_not_found());
    }

    #[test]
    fn list_templates_respects_extension_and_shadowing() {
        let loader = loader();
        loader
            .set_paths(vec![PathBuf::from("views"), PathBuf::from("alt")])
            .unwrap();

        let names = loader.list_templates(&ViewFileExtension::default()).unwrap();

        assert_eq!(names, vec!["page.twig", "partials/nav.twig", "only.twig"]);
    }
}
