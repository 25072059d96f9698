//! BlueMvc Twig Core - view rendering behind ports and adapters
//!
//! This crate holds everything about turning a framework "render this view"
//! call into a template-engine invocation that does not depend on a concrete
//! template library.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     host framework / bluemvc-twig-cli   │
//! │        (calls the ViewRenderer)         │
//! └──────────────────┬──────────────────────┘
//!                    │ render_view
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          ViewRenderService              │
//! │  lazy defaults + the four bindings      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Engine Ports (Traits)              │
//! │  TemplateEngine, TemplateLoader,        │
//! │  Extension / filters / functions        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   bluemvc-twig-adapters (MiniJinja)     │
//! │ JinjaEnvironment, FilesystemLoader, ... │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bluemvc_twig_core::prelude::*;
//!
//! # fn wire(engine: Arc<dyn TemplateEngine>, loader: Arc<dyn TemplateLoader>,
//! #         application: &dyn Application, request: &dyn Request) -> ViewResult<()> {
//! let renderer = ViewRenderService::new(ViewFileExtension::default(), engine, loader);
//! let html = renderer.render_view(application, request, &ViewFile::new("basic.twig")?, None, None)?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what engine adapters and hosts should use
pub mod prelude {
    pub use crate::application::{
        ViewRenderService,
        ports::{
            Application, Extension, Request, TemplateEngine, TemplateFilter, TemplateFunction,
            TemplateLoader, ViewRenderer,
        },
    };
    pub use crate::domain::{
        Bindings, CacheLocation, Model, ViewFile, ViewFileExtension, ViewItemCollection,
    };
    pub use crate::error::{ViewError, ViewResult};
}
