//! JSON Schema validation as a plugin
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::error::{ValidateError, ValidateResult};
use crate::issue::{IssueCategory, Severity, ValidationIssue};
use crate::plugin::ValidatorPlugin;
use jsonschema::Validator;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Reports every JSON Schema violation as a `SCHEMA` error at its instance pointer
pub struct JsonSchemaPlugin {
    name: String,
    validator: Validator,
}

impl JsonSchemaPlugin {
    /// Compile a schema document
    pub fn from_value(schema: &Value) -> ValidateResult<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| ValidateError::schema(e.to_string()))?;
        Ok(Self {
            name: "json-schema".to_string(),
            validator,
        })
    }

    /// Load and compile a schema file; `.yaml`/`.yml` files are read as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> ValidateResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ValidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let schema: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text).map_err(|source| ValidateError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => serde_json::from_str(&text).map_err(|source| ValidateError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };

        log::debug!("loaded schema from {}", path.display());
        Self::from_value(&schema)
    }

    /// Override the plugin name shown in logs and errors
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ValidatorPlugin for JsonSchemaPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>> {
        let issues = self
            .validator
            .iter_errors(ctx.value())
            .map(|error| {
                let pointer = error.instance_path.to_string();
                ctx.issue_at(&pointer, IssueCategory::Schema, Severity::Error, error.to_string())
                    .with_context(json!({ "schema_path": error.schema_path.to_string() }))
            })
            .collect();
        Ok(issues)
    }
}
