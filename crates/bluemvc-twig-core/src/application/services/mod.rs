//! Application services - orchestrate use cases.

pub mod view_render_service;

pub use view_render_service::ViewRenderService;
