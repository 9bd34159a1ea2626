//! Validation issues
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity levels for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the document invalid
    Error,
    /// Worth fixing, does not affect validity
    Warning,
    /// Informational only
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// What kind of problem an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// The text is not JSON
    ParseError,
    /// The text exceeds the configured size limit
    SizeLimit,
    Schema,
    Structure,
    /// The component will not work on the web platform
    WebCompatibility,
    DataBinding,
    Component,
    Version,
    /// Reported by a third-party plugin without a more specific category
    Plugin,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::ParseError => "PARSE_ERROR",
            IssueCategory::SizeLimit => "SIZE_LIMIT",
            IssueCategory::Schema => "SCHEMA",
            IssueCategory::Structure => "STRUCTURE",
            IssueCategory::WebCompatibility => "WEB_COMPATIBILITY",
            IssueCategory::DataBinding => "DATA_BINDING",
            IssueCategory::Component => "COMPONENT",
            IssueCategory::Version => "VERSION",
            IssueCategory::Plugin => "PLUGIN",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found in a document, anchored to a source position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub message: String,
    /// JSON Pointer of the offending location (`""` for the whole document)
    pub pointer: String,
    /// Property Path of the offending location
    pub path: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ValidationIssue {
    /// An issue anchored at the start of the document
    pub fn new(category: IssueCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            pointer: String::new(),
            path: String::new(),
            line: 1,
            column: 1,
            component: None,
            field: None,
            context: None,
        }
    }

    pub fn error(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Error, message)
    }

    pub fn warning(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Warning, message)
    }

    pub fn info(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Info, message)
    }

    pub fn with_location(mut self, pointer: impl Into<String>, path: impl Into<String>) -> Self {
        self.pointer = pointer.into();
        self.path = path.into();
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = line.max(1);
        self.column = column.max(1);
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} [{}] {}", self.line, self.column, self.severity, self.category, self.message)?;
        if !self.path.is_empty() {
            write!(f, " (at {})", self.path)?;
        }
        Ok(())
    }
}
