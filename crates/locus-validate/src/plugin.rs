//! The validator plugin seam
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::issue::ValidationIssue;
use std::fmt;

/// A unit of domain-specific checks run against one parsed document.
///
/// Plugins are stateless with respect to the document: everything they need
/// arrives through the context. Returning `Err` means the plugin itself is
/// broken or misconfigured; problems in the document are reported as issues.
pub trait ValidatorPlugin: Send + Sync {
    /// Name used in logs and in [`crate::ValidateError::Plugin`]
    fn name(&self) -> &str;

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>>;
}

type PluginFn = dyn Fn(&mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>> + Send + Sync;

/// Adapts a closure into a [`ValidatorPlugin`]
pub struct FnPlugin {
    name: String,
    run: Box<PluginFn>,
}

impl FnPlugin {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }
}

impl fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin").field("name", &self.name).finish_non_exhaustive()
    }
}

impl ValidatorPlugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>> {
        (self.run)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueCategory, Severity};
    use locus_core::{ErrorFieldDetector, PathConverter, PositionMap};
    use serde_json::{json, Value};

    #[test]
    fn test_fn_plugin_runs_closure() {
        let plugin = FnPlugin::new("title-required", |ctx| {
            let mut issues = Vec::new();
            if ctx.value().get("title").is_none() {
                issues.push(ctx.issue(IssueCategory::Structure, Severity::Error, "missing 'title'"));
            }
            Ok(issues)
        });
        assert_eq!(plugin.name(), "title-required");

        let value: Value = json!({"body": "text"});
        let positions = PositionMap::default();
        let converter = PathConverter::new();
        let detector = ErrorFieldDetector::uncached();
        let mut ctx = ValidationContext::new("doc.json", "", &value, &positions, &converter, &detector);

        let issues = plugin.validate(&mut ctx).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("title"));
    }
}
