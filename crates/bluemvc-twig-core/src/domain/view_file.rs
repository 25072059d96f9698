use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use super::DomainError;

/// Extension claimed by a renderer when none is configured.
pub const DEFAULT_VIEW_FILE_EXTENSION: &str = "twig";

/// A view file relative to the configured view paths.
///
/// Invariant: never absolute, never escapes its search path with `..`, and
/// names at least one file component. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewFile {
    path: PathBuf,
    name: String,
}

impl ViewFile {
    /// Fallible constructor.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let invalid = |reason: &str| DomainError::InvalidViewFile {
            path: path.display().to_string(),
            reason: reason.into(),
        };

        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| invalid("path is not valid UTF-8"))?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("'..' would leave the configured view paths"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("absolute paths are not allowed"));
                }
            }
        }

        if segments.is_empty() {
            return Err(invalid("path is empty"));
        }

        let name = segments.join("/");
        Ok(Self { path, name })
    }

    /// The path as given.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Name handed to the engine: components joined with `/`.
    pub fn template_name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ViewFile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ViewFile {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<Path> for ViewFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ViewFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// File extension a renderer claims, without the leading dot.
///
/// Multi-part extensions such as `html.tpl` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewFileExtension(String);

impl ViewFileExtension {
    /// Create an extension, stripping leading dots. No validation.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self(extension.trim_start_matches('.').to_owned())
    }

    /// Validating constructor used for user-supplied values.
    pub fn parse(extension: &str) -> Result<Self, DomainError> {
        let candidate = Self::new(extension);
        let invalid = |reason: &str| DomainError::InvalidExtension {
            extension: extension.to_owned(),
            reason: reason.into(),
        };

        if candidate.0.is_empty() {
            return Err(invalid("extension is empty"));
        }
        if candidate.0.contains(['/', '\\']) {
            return Err(invalid("extension must not contain path separators"));
        }
        if candidate.0.ends_with('.') {
            return Err(invalid("extension must not end with '.'"));
        }
        Ok(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if the file name of `path` ends in `.<extension>` and has a
    /// non-empty stem.
    pub fn matches(&self, path: &Path) -> bool {
        if self.0.is_empty() {
            return false;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        file_name
            .strip_suffix(self.0.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .is_some_and(|stem| !stem.is_empty())
    }
}

impl Default for ViewFileExtension {
    fn default() -> Self {
        Self(DEFAULT_VIEW_FILE_EXTENSION.to_owned())
    }
}

impl From<&str> for ViewFileExtension {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ViewFileExtension {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ViewFileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_file_template_name_uses_forward_slashes() {
        let file = ViewFile::new(Path::new("partials").join("header.twig")).unwrap();
        assert_eq!(file.template_name(), "partials/header.twig");
    }

    #[test]
    fn view_file_skips_current_dir_segments() {
        let file = ViewFile::new("./basic.twig").unwrap();
        assert_eq!(file.template_name(), "basic.twig");
    }

    #[test]
    fn view_file_rejects_parent_segments() {
        assert!(matches!(
            ViewFile::new("../secret.twig"),
            Err(DomainError::InvalidViewFile { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn view_file_rejects_absolute_paths() {
        assert!(ViewFile::new("/etc/passwd").is_err());
    }

    #[test]
    fn view_file_rejects_empty() {
        assert!(ViewFile::new("").is_err());
        assert!(ViewFile::new(".").is_err());
    }

    #[test]
    fn default_extension_is_twig() {
        assert_eq!(ViewFileExtension::default().as_str(), "twig");
    }

    #[test]
    fn extension_strips_leading_dot() {
        assert_eq!(ViewFileExtension::new(".twig").as_str(), "twig");
    }

    #[test]
    fn extension_matches_multi_part_suffix() {
        let ext = ViewFileExtension::new("html.tpl");

        assert!(ext.matches(Path::new("views/index.html.tpl")));
        assert!(!ext.matches(Path::new("views/index.tpl")));
        assert!(!ext.matches(Path::new("views/.html.tpl")));
    }

    #[test]
    fn extension_does_not_match_partial_word() {
        let ext = ViewFileExtension::default();

        assert!(ext.matches(Path::new("basic.twig")));
        assert!(!ext.matches(Path::new("basic.xtwig")));
        assert!(!ext.matches(Path::new("twig")));
    }

    #[test]
    fn extension_parse_rejects_invalid() {
        assert!(ViewFileExtension::parse("").is_err());
        assert!(ViewFileExtension::parse("...").is_err());
        assert!(ViewFileExtension::parse("a/b").is_err());
        assert_eq!(ViewFileExtension::parse(".twig").unwrap().as_str(), "twig");
    }
}
