use std::fmt;
use std::path::{Path, PathBuf};

/// Directory under the application's temp path reserved for the engine cache.
pub const CACHE_SUBDIRECTORY: [&str; 2] = ["bluemvc-twig", "cache"];

/// Where the engine may keep compiled templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CacheLocation {
    /// No cache directory.
    #[default]
    Disabled,
    /// Cache rooted at this directory. The layout below it belongs to the
    /// engine.
    Directory(PathBuf),
}

impl CacheLocation {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    /// `<temp_path>/bluemvc-twig/cache/`, trailing separator included.
    pub fn for_temp_path(temp_path: &Path) -> Self {
        let mut path = temp_path.to_path_buf();
        for segment in CACHE_SUBDIRECTORY {
            path.push(segment);
        }
        path.push("");
        Self::Directory(path)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Disabled => None,
            Self::Directory(path) => Some(path),
        }
    }
}

impl fmt::Display for CacheLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disabled() {
        assert!(CacheLocation::default().is_disabled());
        assert_eq!(CacheLocation::default().as_path(), None);
    }

    #[cfg(unix)]
    #[test]
    fn temp_path_cache_keeps_trailing_separator() {
        let cache = CacheLocation::for_temp_path(Path::new("/var/tmp"));
        assert_eq!(cache.to_string(), "/var/tmp/bluemvc-twig/cache/");
    }

    #[test]
    fn temp_path_cache_is_below_temp() {
        let temp = Path::new("tmp-root");
        let cache = CacheLocation::for_temp_path(temp);

        let path = cache.as_path().unwrap();
        assert!(path.starts_with(temp));
        assert!(path.ends_with(Path::new("bluemvc-twig").join("cache")));
    }
}
