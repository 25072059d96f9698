//! Infrastructure adapters for bluemvc-twig.
//!
//! This crate implements the ports defined in
//! `bluemvc-twig-core::application::ports` on top of MiniJinja, whose syntax
//! is compatible with Twig templates (`{{ Model.Header }}`, `{% include %}`,
//! filters).

pub mod environment;
pub mod host;
pub mod loader;
pub mod renderer;

// Re-export commonly used adapters
pub use environment::JinjaEnvironment;
pub use host::{SimpleApplication, SimpleRequest};
pub use loader::{FilesystemLoader, MemoryLoader};
pub use renderer::TwigViewRenderer;
