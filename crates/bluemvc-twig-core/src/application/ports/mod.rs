//! Application ports (traits) for external collaborators.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the renderer, implemented by engines
//!   - `TemplateEngine`: template load + render, cache/strict/debug settings
//!   - `TemplateLoader`: ordered search paths and template resolution
//!   - `Extension`, `TemplateFilter`, `TemplateFunction`: engine plug-ins
//!
//! - **Driving (Input) Ports**: called by the host framework
//!   - `ViewRenderer`
//!
//! - **Host context**: supplied by the host on every render
//!   - `Application`, `Request`

pub mod host;
pub mod input;
pub mod output;

pub use host::{Application, Request};
pub use input::ViewRenderer;
pub use output::{
    Extension, FnFilter, FnFunction, TemplateEngine, TemplateFilter, TemplateFunction,
    TemplateLoader,
};

#[cfg(test)]
pub use output::{MockTemplateEngine, MockTemplateLoader};
