//! Locus Validate - position-aware validation of JSON documents
//!
//! The [`Orchestrator`] parses a document, builds its position map, runs every
//! registered [`ValidatorPlugin`] against a shared [`ValidationContext`] and
//! folds the findings together with two built-in scans into a
//! [`ValidationReport`]. Every issue carries the line and column of the node
//! it concerns.
//!
//! # Example
//!
//! ```
//! use locus_validate::{IssueCategory, Orchestrator, PlatformSupportPlugin};
//!
//! let text = r#"{
//!   "type": "Screen",
//!   "children": [
//!     {"type": "Map", "platforms": {"web": "unsupported"}}
//!   ]
//! }"#;
//!
//! let orchestrator = Orchestrator::default().with_plugin(PlatformSupportPlugin::new());
//! let report = orchestrator.validate("screen.json", text).unwrap();
//!
//! assert!(!report.valid);
//! assert_eq!(report.errors[0].category, IssueCategory::WebCompatibility);
//! assert_eq!(report.errors[0].line, 4);
//! ```
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod error;
pub mod issue;
pub mod orchestrator;
pub mod plugin;
pub mod plugins;
pub mod report;
pub mod scan;

pub use context::ValidationContext;
pub use error::{ValidateError, ValidateResult};
pub use issue::{IssueCategory, Severity, ValidationIssue};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use plugin::{FnPlugin, ValidatorPlugin};
pub use plugins::{JsonSchemaPlugin, PlatformSupportPlugin};
pub use report::{ValidationReport, WebCompatibility};
pub use scan::{
    scan_components, scan_data_bindings, BindingKind, ComponentVersionStats, DataBinding, DataBindingStats,
};
