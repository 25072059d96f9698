//! Domain values for view rendering.
//!
//! Pure values with no I/O: which file to render, what the model and view
//! items are, where compiled templates may be cached, and the exact set of
//! bindings a template sees.

pub mod bindings;
pub mod cache;
pub mod error;
pub mod model;
pub mod view_file;

pub use bindings::Bindings;
pub use cache::{CACHE_SUBDIRECTORY, CacheLocation};
pub use error::DomainError;
pub use model::{Model, ViewItemCollection};
pub use view_file::{DEFAULT_VIEW_FILE_EXTENSION, ViewFile, ViewFileExtension};
