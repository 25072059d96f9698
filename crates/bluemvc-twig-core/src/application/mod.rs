//! Application layer for the view renderer.
//!
//! This layer contains:
//! - **Services**: `ViewRenderService`, the configure-and-render handshake
//! - **Ports**: traits for the host framework, the template engine and its
//!   loader, and engine extensions
//! - **Errors**: engine and orchestration error types
//!
//! No template library is referenced here; engines live in
//! `bluemvc-twig-adapters`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::ViewRenderService;

// Re-export port traits (for adapter implementation)
pub use ports::{
    Application, Extension, Request, TemplateEngine, TemplateFilter, TemplateFunction,
    TemplateLoader, ViewRenderer,
};

pub use error::{ApplicationError, TemplateError, TemplateErrorKind};
