//! Application layer errors.
//!
//! [`TemplateError`] is what an engine adapter reports; the renderer passes
//! it through untouched. [`ApplicationError`] covers orchestration failures
//! that belong to neither the domain nor the engine.

use std::fmt;

use thiserror::Error;

use crate::error::ErrorCategory;

/// What went wrong inside the template engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateErrorKind {
    /// The template could not be resolved in any search path.
    NotFound,
    /// Malformed template source.
    Syntax,
    /// Strict mode: an undefined variable or attribute was used.
    UndefinedVariable,
    /// Any other failure while rendering (bad filter call, failing extension).
    Render,
    /// The engine failed to read a template or prepare its cache.
    Io,
}

impl fmt::Display for TemplateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "Template not found",
            Self::Syntax => "Template syntax error",
            Self::UndefinedVariable => "Undefined variable",
            Self::Render => "Template render error",
            Self::Io => "Template I/O error",
        };
        f.write_str(label)
    }
}

/// Error reported by a template engine adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TemplateError {
    kind: TemplateErrorKind,
    message: String,
    name: Option<String>,
    line: Option<usize>,
}

impl TemplateError {
    pub fn new(kind: TemplateErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            name: None,
            line: None,
        }
    }

    /// Template `name` could not be resolved.
    pub fn not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            TemplateErrorKind::NotFound,
            format!("Unable to find template \"{name}\""),
        )
        .with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Template the error was raised in, when the engine knows it.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self.kind {
            TemplateErrorKind::NotFound => vec![
                "Check that the view file exists below one of the view paths".into(),
                "Search paths are tried in order; the first match wins".into(),
            ],
            TemplateErrorKind::Syntax => {
                let mut hints = vec!["Fix the template syntax".into()];
                if let (Some(name), Some(line)) = (&self.name, self.line) {
                    hints.push(format!("Look at {name}, line {line}"));
                }
                hints
            }
            TemplateErrorKind::UndefinedVariable => vec![
                "Strict variables are enabled; every referenced variable must be set".into(),
                "Pass the value in the model or view items, or disable strict variables".into(),
            ],
            TemplateErrorKind::Render => vec!["Check the filters and functions the template uses".into()],
            TemplateErrorKind::Io => vec![
                "Check read permissions on the view paths".into(),
                "Check write permissions on the cache directory".into(),
            ],
        }
    }
}

/// Errors that occur during orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Shared renderer state is unusable after a panic in another thread.
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },

    /// An extension with this name is already registered on the engine.
    #[error("Extension '{name}' is already registered")]
    ExtensionAlreadyRegistered { name: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::LockPoisoned { resource } => vec![
                format!("The {} was poisoned by a panic elsewhere", resource),
                "Create a new renderer".into(),
            ],
            Self::ExtensionAlreadyRegistered { name } => vec![
                format!("Register '{}' only once per renderer", name),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
            Self::ExtensionAlreadyRegistered { .. } => ErrorCategory::Configuration,
        }
    }
}
