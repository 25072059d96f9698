//! Driven (output) ports - implemented by template engine adapters.
//!
//! The engine and its loader are black boxes to the renderer. All methods
//! take `&self`: handles are shared (`Arc`) between the renderer and the
//! caller, and a change made through one handle is seen by the other.

mod extension;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use crate::domain::{Bindings, CacheLocation, ViewFileExtension};
use crate::error::ViewResult;

pub use extension::{Extension, FnFilter, FnFunction, TemplateFilter, TemplateFunction};

/// Port for locating template sources.
///
/// Implemented by:
/// - `bluemvc_twig_adapters::FilesystemLoader` (production)
/// - `bluemvc_twig_adapters::MemoryLoader` (testing, embedded views)
///
/// ## Design Notes
///
/// - "Never configured" and "configured with an empty list" are distinct:
///   [`TemplateLoader::is_configured`] reports the former.
/// - Search paths are tried in order; the first match wins.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateLoader: Send + Sync {
    /// Current search paths, in priority order.
    fn paths(&self) -> Vec<PathBuf>;

    /// `true` once search paths were set, even to an empty list.
    fn is_configured(&self) -> bool;

    /// Replace the search paths.
    fn set_paths(&self, paths: Vec<PathBuf>) -> ViewResult<()>;

    /// Append a search path (lowest priority).
    fn add_path(&self, path: PathBuf) -> ViewResult<()>;

    /// Prepend a search path (highest priority).
    fn prepend_path(&self, path: PathBuf) -> ViewResult<()>;

    /// Counter bumped on every search-path change.
    fn revision(&self) -> u64;

    /// Resolve `name` to the file that would be loaded.
    fn resolve(&self, name: &str) -> ViewResult<PathBuf>;

    /// `true` if `name` resolves.
    fn exists(&self, name: &str) -> bool;

    /// Read the source of `name`.
    fn load_source(&self, name: &str) -> ViewResult<String>;

    /// `true` if `name` has not changed since `time`.
    fn is_fresh(&self, name: &str, time: SystemTime) -> bool;

    /// Names of every template carrying `extension`, shadowed ones excluded.
    fn list_templates(&self, extension: &ViewFileExtension) -> ViewResult<Vec<String>>;
}

/// Port for the template engine.
///
/// Implemented by:
/// - `bluemvc_twig_adapters::JinjaEnvironment` (MiniJinja)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine: Send + Sync {
    /// Load `name` through the loader and render it with `bindings`.
    ///
    /// Failures are reported as [`crate::error::ViewError::Template`].
    fn render(&self, name: &str, bindings: &Bindings) -> ViewResult<String>;

    /// Current cache setting; [`CacheLocation::Disabled`] when never set.
    fn cache(&self) -> CacheLocation;

    /// `true` once a cache setting was made, including an explicit
    /// [`CacheLocation::Disabled`].
    fn is_cache_configured(&self) -> bool;

    fn set_cache(&self, cache: CacheLocation) -> ViewResult<()>;

    fn is_strict_variables(&self) -> bool;

    /// Strict: undefined variables fail the render. Otherwise they render
    /// as empty.
    fn set_strict_variables(&self, enabled: bool) -> ViewResult<()>;

    fn is_debug(&self) -> bool;

    fn set_debug(&self, enabled: bool) -> ViewResult<()>;

    /// Register every filter and function of `extension`.
    fn add_extension(&self, extension: Arc<dyn Extension>) -> ViewResult<()>;

    /// Names of registered extensions, in registration order.
    fn extensions(&self) -> Vec<String>;

    fn add_filter(&self, filter: Arc<dyn TemplateFilter>) -> ViewResult<()>;

    fn add_function(&self, function: Arc<dyn TemplateFunction>) -> ViewResult<()>;
}
