//! Error types for validation runs
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for validation operations
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Failures that abort a validation run.
///
/// Problems with the document itself never show up here; they are reported
/// as issues inside a [`crate::ValidationReport`].
#[derive(Error, Debug)]
pub enum ValidateError {
    /// A registered plugin failed; this is a configuration problem, not a data problem
    #[error("Validator plugin '{plugin}' failed: {source:#}")]
    Plugin {
        plugin: String,
        source: anyhow::Error,
    },

    /// A schema could not be loaded or compiled
    #[error("Invalid schema: {message}")]
    Schema { message: String },

    /// Path or position errors from the core library
    #[error(transparent)]
    Core(#[from] locus_core::Error),

    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing errors outside the validated document (schemas, configs)
    #[error("Failed to parse JSON file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl ValidateError {
    pub fn schema(message: impl Into<String>) -> Self {
        ValidateError::Schema {
            message: message.into(),
        }
    }

    /// Name of the failing plugin, if a plugin caused this error
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            ValidateError::Plugin { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_keeps_cause_chain() {
        let cause = anyhow::anyhow!("disk on fire").context("loading rules");
        let error = ValidateError::Plugin {
            plugin: "rules".to_string(),
            source: cause,
        };
        let text = error.to_string();
        assert!(text.contains("'rules'"));
        assert!(text.contains("loading rules"));
        assert!(text.contains("disk on fire"));
        assert_eq!(error.plugin_name(), Some("rules"));
    }

    #[test]
    fn test_core_errors_convert() {
        let core = locus_core::Error::UnsupportedFormat { name: "xpath".into() };
        let error: ValidateError = core.into();
        assert!(matches!(error, ValidateError::Core(_)));
        assert_eq!(error.plugin_name(), None);
    }
}
