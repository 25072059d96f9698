//! Concrete view renderers.

mod twig;

pub use twig::TwigViewRenderer;
