//! Error types for the Locus core library
//!
//! Only two kinds of failure ever leave this crate as an `Err`: a path that
//! cannot be parsed in any notation, and I/O or JSON failures at the edges
//! (loading files, talking to a native query engine). Everything else
//! degrades to a best-effort answer tagged with a confidence or method.
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::path::PathFormat;
use thiserror::Error;

/// Main error type for Locus core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A path string could not be parsed in the requested notation
    #[error("Invalid {format} path '{path}' at position {position}: {message}")]
    InvalidPath {
        path: String,
        format: PathFormat,
        message: String,
        position: usize,
    },

    /// An unknown notation name was supplied
    #[error("Unsupported path format: {name}")]
    UnsupportedFormat { name: String },

    /// A query expression failed in every available evaluator
    #[error("Query '{expression}' failed: {message}")]
    Query {
        expression: String,
        message: String,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid path error
    pub fn invalid_path(
        path: impl Into<String>,
        format: PathFormat,
        message: impl Into<String>,
        position: usize,
    ) -> Self {
        Self::InvalidPath {
            path: path.into(),
            format,
            message: message.into(),
            position,
        }
    }

    /// Create a query error
    pub fn query(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Whether this error was caused by malformed caller input
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidPath { .. } | Self::UnsupportedFormat { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
            source,
        }
    }
}
