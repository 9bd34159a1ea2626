//! Platform support checks for components carrying a release-state map
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::issue::{IssueCategory, Severity, ValidationIssue};
use crate::plugin::ValidatorPlugin;
use crate::scan::components::{PLATFORMS_KEY, TYPE_KEY};
use serde_json::{json, Map, Value};

const WEB: &str = "web";

/// Flags components that will not work, or may not work, on the web platform.
///
/// | platform | state                    | issue                        |
/// |----------|--------------------------|------------------------------|
/// | `web`    | `unsupported`            | `WEB_COMPATIBILITY` error    |
/// | `web`    | `experimental` / `beta`  | `WEB_COMPATIBILITY` info     |
/// | any      | `deprecated`             | `COMPONENT` warning          |
///
/// A `platforms` member that is not an object of strings yields a
/// `STRUCTURE` warning.
#[derive(Debug, Clone, Default)]
pub struct PlatformSupportPlugin;

impl PlatformSupportPlugin {
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, value: &Value, ctx: &mut ValidationContext<'_>, issues: &mut Vec<ValidationIssue>) {
        match value {
            Value::Object(object) => {
                if let Some(component) = object.get(TYPE_KEY).and_then(Value::as_str) {
                    if let Some(platforms) = object.get(PLATFORMS_KEY) {
                        ctx.enter_key(PLATFORMS_KEY);
                        self.check_platforms(component, platforms, ctx, issues);
                        ctx.leave();
                    }
                }
                for (key, child) in object {
                    ctx.enter_key(key.as_str());
                    self.walk(child, ctx, issues);
                    ctx.leave();
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    ctx.enter_index(index);
                    self.walk(child, ctx, issues);
                    ctx.leave();
                }
            }
            _ => {}
        }
    }

    fn check_platforms(
        &self,
        component: &str,
        platforms: &Value,
        ctx: &mut ValidationContext<'_>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let Some(states) = platforms.as_object().filter(|map| all_strings(map)) else {
            issues.push(
                ctx.issue(
                    IssueCategory::Structure,
                    Severity::Warning,
                    format!("Component '{component}' has a malformed platforms map; expected platform names mapped to release states"),
                )
                .with_component(component),
            );
            return;
        };

        for (platform, state) in states {
            let Some(state) = state.as_str() else { continue };
            let finding = match (platform.as_str(), state) {
                (WEB, "unsupported") => Some((
                    IssueCategory::WebCompatibility,
                    Severity::Error,
                    format!("Component '{component}' is not supported on web"),
                )),
                (WEB, "experimental" | "beta") => Some((
                    IssueCategory::WebCompatibility,
                    Severity::Info,
                    format!("Component '{component}' is {state} on web"),
                )),
                (_, "deprecated") => Some((
                    IssueCategory::Component,
                    Severity::Warning,
                    format!("Component '{component}' is deprecated on {platform}"),
                )),
                _ => None,
            };

            if let Some((category, severity, message)) = finding {
                ctx.enter_key(platform.as_str());
                issues.push(
                    ctx.issue(category, severity, message)
                        .with_component(component)
                        .with_context(json!({ "platform": platform, "state": state })),
                );
                ctx.leave();
            }
        }
    }
}

fn all_strings(map: &Map<String, Value>) -> bool {
    map.values().all(Value::is_string)
}

impl ValidatorPlugin for PlatformSupportPlugin {
    fn name(&self) -> &str {
        "platform-support"
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) -> anyhow::Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let root = ctx.value();
        self.walk(root, ctx, &mut issues);
        Ok(issues)
    }
}
