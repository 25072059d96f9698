//! Unified error handling for the view renderer.
//!
//! [`ViewError`] wraps domain, template-engine and application errors behind
//! one type. Engine errors are carried as-is in [`ViewError::Template`] so a
//! caller sees exactly what the engine reported.

use thiserror::Error;

use crate::application::{ApplicationError, TemplateError, TemplateErrorKind};
use crate::domain::DomainError;

/// Root error type for view rendering.
#[derive(Debug, Error, Clone)]
pub enum ViewError {
    /// Invalid values handed to the renderer (view file, extension, model).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Failure reported by the template engine: not found, syntax, strict
    /// undefined variable, render failure.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Orchestration failures (lock poisoned, duplicate extension).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl ViewError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Template(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Template(e) => match e.kind() {
                TemplateErrorKind::NotFound => ErrorCategory::NotFound,
                TemplateErrorKind::Io => ErrorCategory::Internal,
                _ => ErrorCategory::Template,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// The engine error, if this is one.
    pub fn as_template_error(&self) -> Option<&TemplateError> {
        match self {
            Self::Template(e) => Some(e),
            _ => None,
        }
    }

    /// `true` if the engine could not resolve the requested template.
    pub fn is_template_not_found(&self) -> bool {
        self.as_template_error()
            .is_some_and(|e| e.kind() == TemplateErrorKind::NotFound)
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Template,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ViewResult<T> = Result<T, ViewError>;
