//! Validation reports
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::issue::{IssueCategory, Severity, ValidationIssue};
use crate::scan::{ComponentVersionStats, DataBindingStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Share of issues that do not make a component incompatible with the web
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebCompatibility {
    /// Percentage in `[0, 100]`; 100 when there are no issues at all
    pub score: f64,
    pub incompatible: usize,
    pub total: usize,
}

impl WebCompatibility {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a ValidationIssue>) -> Self {
        let mut total = 0;
        let mut incompatible = 0;
        for issue in issues {
            total += 1;
            // info-level findings (beta, experimental) still work on the web
            if issue.category == IssueCategory::WebCompatibility && issue.severity != Severity::Info {
                incompatible += 1;
            }
        }
        let score = if total == 0 {
            100.0
        } else {
            (100.0 * (1.0 - incompatible as f64 / total as f64)).clamp(0.0, 100.0)
        };
        Self {
            score,
            incompatible,
            total,
        }
    }
}

/// The terminal artifact of one validation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub file_path: String,
    /// True exactly when `errors` is empty
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    /// Warning and info issues
    pub warnings: Vec<ValidationIssue>,
    pub web_compatibility: WebCompatibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_binding_stats: Option<DataBindingStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_version_stats: Option<ComponentVersionStats>,
    pub validation_time_ms: f64,
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Partition issues by severity and compute the derived fields
    pub fn from_issues(
        file_path: impl Into<String>,
        issues: Vec<ValidationIssue>,
        data_binding_stats: Option<DataBindingStats>,
        component_version_stats: Option<ComponentVersionStats>,
        elapsed: Duration,
    ) -> Self {
        let web_compatibility = WebCompatibility::from_issues(&issues);
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(|issue| issue.severity == Severity::Error);

        Self {
            file_path: file_path.into(),
            valid: errors.is_empty(),
            errors,
            warnings,
            web_compatibility,
            data_binding_stats,
            component_version_stats,
            validation_time_ms: elapsed.as_secs_f64() * 1000.0,
            validated_at: Utc::now(),
        }
    }

    /// A report holding a single fatal issue and nothing else
    pub fn fatal(file_path: impl Into<String>, issue: ValidationIssue, elapsed: Duration) -> Self {
        Self::from_issues(file_path, vec![issue], None, None, elapsed)
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Every issue, errors first
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn has_category(&self, category: IssueCategory) -> bool {
        self.issues().any(|issue| issue.category == category)
    }
}
