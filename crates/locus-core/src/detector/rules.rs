//! Detection rules and the built-in rule tiers
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::Confidence;
use crate::path::PathConverter;
use regex::Regex;
use std::sync::OnceLock;

/// How a matching rule produces a field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// Always the same field
    Fixed(String),
    /// The text of a capture group in the message
    Capture(usize),
    /// The last segment of the path the error was raised at
    LastPathSegment,
}

/// One `(pattern, extractor, priority)` rule
#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub name: String,
    pub pattern: Regex,
    pub extractor: Extractor,
    pub priority: i32,
    pub confidence: Confidence,
}

impl DetectionRule {
    pub fn new(
        name: impl Into<String>,
        pattern: Regex,
        extractor: Extractor,
        priority: i32,
        confidence: Confidence,
    ) -> Self {
        Self {
            name: name.into(),
            pattern,
            extractor,
            priority,
            confidence,
        }
    }

    /// Apply the rule. `None` means the rule does not match; `Some(None)`
    /// means it matched but the path had no segment to offer.
    pub fn apply(&self, message: &str, path: &str) -> Option<Option<String>> {
        match &self.extractor {
            Extractor::Fixed(field) => self.pattern.is_match(message).then(|| Some(field.clone())),
            Extractor::Capture(group) => {
                let captures = self.pattern.captures(message)?;
                let text = captures.get(*group)?.as_str().trim();
                if text.is_empty() {
                    None
                } else {
                    Some(Some(text.to_string()))
                }
            }
            Extractor::LastPathSegment => self.pattern.is_match(message).then(|| last_path_segment(path)),
        }
    }
}

/// Last segment of a path in any notation, or `None` for the root
pub fn last_path_segment(path: &str) -> Option<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }
    match PathConverter::new().last_segment(trimmed) {
        Ok(segment) => segment.map(|s| s.raw().into_owned()).filter(|s| !s.is_empty()),
        Err(_) => trimmed
            .rsplit(|c| c == '/' || c == '.')
            .find(|s| !s.is_empty())
            .map(str::to_string),
    }
}

pub(crate) const PRIORITY_COMPONENT: i32 = 100;
pub(crate) const PRIORITY_NAMED_FIELD: i32 = 90;
pub(crate) const PRIORITY_VOCABULARY: i32 = 70;
pub(crate) const PRIORITY_MISMATCH: i32 = 50;
pub(crate) const PRIORITY_FALLBACK: i32 = 0;

static BUILTIN_RULES: OnceLock<Vec<DetectionRule>> = OnceLock::new();

fn rule(name: &str, pattern: &str, extractor: Extractor, priority: i32, confidence: Confidence) -> DetectionRule {
    let pattern = Regex::new(pattern).expect("built-in detection pattern must compile");
    DetectionRule::new(name, pattern, extractor, priority, confidence)
}

/// The built-in rule tiers, highest priority first
pub fn builtin_rules() -> &'static [DetectionRule] {
    BUILTIN_RULES.get_or_init(|| {
        vec![
            rule(
                "unknown_component",
                r#"(?i)\b(?:unknown|unregistered|unsupported)\s+(?:component|widget|element)(?:\s+type)?\b"#,
                Extractor::Fixed("type".to_string()),
                PRIORITY_COMPONENT,
                Confidence::High,
            ),
            rule(
                "component_not_found",
                r#"(?i)\b(?:component|widget|element)(?:\s+type)?\s+(?:'[^']*'\s+|"[^"]*"\s+|`[^`]*`\s+|[\w.-]+\s+)?(?:was\s+|is\s+)?(?:not\s+found|not\s+registered|does\s+not\s+exist)"#,
                Extractor::Fixed("type".to_string()),
                PRIORITY_COMPONENT,
                Confidence::High,
            ),
            rule(
                "required_property",
                r#"['"`]([^'"`]+)['"`]\s+is\s+a\s+required\s+property"#,
                Extractor::Capture(1),
                PRIORITY_NAMED_FIELD,
                Confidence::High,
            ),
            rule(
                "unexpected_property",
                r#"\(\s*['"`]([^'"`]+)['"`](?:,[^)]*)?\s+(?:was|were)\s+unexpected\s*\)"#,
                Extractor::Capture(1),
                PRIORITY_NAMED_FIELD,
                Confidence::High,
            ),
            rule(
                "named_field",
                r#"(?i)\b(?:missing|required|invalid|unexpected|unknown)\s+(?:required\s+)?(?:field|property|key|attribute)?\s*['"`]([^'"`]+)['"`]"#,
                Extractor::Capture(1),
                PRIORITY_NAMED_FIELD,
                Confidence::High,
            ),
            rule(
                "named_field_suffix",
                r#"(?i)['"`]([^'"`]+)['"`]\s+(?:is\s+)?(?:missing|required|invalid|not\s+allowed)\b"#,
                Extractor::Capture(1),
                PRIORITY_NAMED_FIELD,
                Confidence::High,
            ),
            rule(
                "deprecation",
                r#"(?i)\bdeprecat(?:ed|ion)\b"#,
                Extractor::Fixed("deprecated".to_string()),
                PRIORITY_VOCABULARY,
                Confidence::Medium,
            ),
            rule(
                "release_state",
                r#"(?i)\b(?:platforms?|experimental|beta|release\s+state|unsupported\s+on)\b"#,
                Extractor::Fixed("platforms".to_string()),
                PRIORITY_VOCABULARY,
                Confidence::Medium,
            ),
            rule(
                "version",
                r#"(?i)\b(?:min(?:imum)?[\s_-]?version|since\s+version|version)\b"#,
                Extractor::Fixed("version".to_string()),
                PRIORITY_VOCABULARY,
                Confidence::Medium,
            ),
            rule(
                "enum_mismatch",
                r#"(?i)\bis\s+not\s+one\s+of\b|\bexpected\s+one\s+of\b|\bnot\s+(?:a|an)?\s*(?:valid|allowed)\s+(?:value|option)\b|\benum\b"#,
                Extractor::LastPathSegment,
                PRIORITY_MISMATCH,
                Confidence::Medium,
            ),
            rule(
                "type_mismatch",
                r#"(?i)\bis\s+not\s+of\s+type\b|\btype\s+mismatch\b|\binvalid\s+type\b|\bexpected\s+(?:a|an)?\s*(?:string|number|integer|boolean|object|array|null)\b"#,
                Extractor::LastPathSegment,
                PRIORITY_MISMATCH,
                Confidence::Medium,
            ),
            rule("fallback", r#"^"#, Extractor::LastPathSegment, PRIORITY_FALLBACK, Confidence::Low),
        ]
    })
}
