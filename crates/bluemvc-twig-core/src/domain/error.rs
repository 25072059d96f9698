use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors raised while building domain values.
///
/// All errors are cloneable and carry enough context to explain what was
/// rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid view file '{path}': {reason}")]
    InvalidViewFile { path: String, reason: String },

    #[error("Invalid view file extension '{extension}': {reason}")]
    InvalidExtension { extension: String, reason: String },

    #[error("Model cannot be used as a template value: {0}")]
    InvalidModel(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidViewFile { path, .. } => vec![
                format!("View files are relative to the view paths: {}", path),
                "Remove leading '/' and any '..' segments".into(),
            ],
            Self::InvalidExtension { .. } => vec![
                "Use a plain extension such as 'twig' or 'html.tpl'".into(),
            ],
            Self::InvalidModel(_) => vec![
                "Models must serialize to JSON-like data (maps, lists, strings, numbers)".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}
