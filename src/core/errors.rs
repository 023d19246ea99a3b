//! Shared error types for the application

use crate::core::ast::Pos;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for decouple operations
#[derive(Debug, Error)]
pub enum Error {
    /// The type oracle's answers do not fit the shape of the syntax tree.
    ///
    /// Either the input program is only partially resolved or the analyzer
    /// has a defect; never a property of the user's code.
    #[error("internal inconsistency: {message} at {pos}")]
    Inconsistency { message: String, pos: Pos },

    /// A corpus document that cannot be used as analysis input
    #[error("Corpus error: {message}")]
    Corpus {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an internal-inconsistency error at a position
    pub fn inconsistency(message: impl Into<String>, pos: Pos) -> Self {
        Self::Inconsistency {
            message: message.into(),
            pos,
        }
    }

    /// Create a corpus error, optionally naming the offending file
    pub fn corpus(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Corpus {
            message: message.into(),
            path,
        }
    }

    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Self::Inconsistency { .. })
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
