//! Error types for schema conversion and form validation

use thiserror::Error;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Conversion and validation errors
///
/// Every located variant renders as `"{path}: {message}"`, where `path` is the
/// index chain of the offending field (e.g. `fields[1].fields[0]`).
#[derive(Error, Debug)]
pub enum FormError {
    /// Missing root schema or a form without fields
    #[error("{0}")]
    Structural(String),

    /// Invalid name pattern, reserved word, or duplicate within a scope
    #[error("{path}: {message}")]
    Name { path: String, message: String },

    /// Unrecognized field kind, or nested fields on a non-container kind
    #[error("{path}: {message}")]
    Kind { path: String, message: String },

    /// Options or validation bounds inconsistent with the field
    #[error("{path}: {message}")]
    Constraint { path: String, message: String },

    /// Conditional naming a field missing from its enclosing scope
    #[error("{path}: {message}")]
    Reference { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn name(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Name { path: path.into(), message: message.into() }
    }

    pub fn kind(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Kind { path: path.into(), message: message.into() }
    }

    pub fn constraint(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint { path: path.into(), message: message.into() }
    }

    pub fn reference(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reference { path: path.into(), message: message.into() }
    }

    /// Path of the offending node, if the error is located in the field tree
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Name { path, .. }
            | Self::Kind { path, .. }
            | Self::Constraint { path, .. }
            | Self::Reference { path, .. } => Some(path),
            _ => None,
        }
    }
}
