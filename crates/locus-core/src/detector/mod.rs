//! Error field detection
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license
//!
//! Validators report failures as free-form messages plus the path where the
//! failure was raised. [`ErrorFieldDetector`] maps such a pair to the field
//! most likely responsible, using an ordered list of [`DetectionRule`]s where
//! the first match wins.

pub mod rules;

pub use rules::{builtin_rules, last_path_segment, DetectionRule, Extractor};

use crate::path::CacheConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How sure the detector is about a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Outcome of a detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFieldInfo {
    /// The responsible field, if any could be named
    pub field: Option<String>,
    /// Path the error was raised at, as supplied
    pub path: String,
    pub confidence: Confidence,
    /// Name of the rule that matched
    pub reason: String,
}

/// Shared `(message, path)` → result cache
#[derive(Debug, Default)]
pub struct DetectorCache {
    entries: RwLock<HashMap<(String, String), ErrorFieldInfo>>,
    config: CacheConfig,
}

impl DetectorCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    fn get(&self, message: &str, path: &str) -> Option<ErrorFieldInfo> {
        if !self.config.enabled {
            return None;
        }
        self.entries
            .read()
            .get(&(message.to_string(), path.to_string()))
            .cloned()
    }

    fn insert(&self, message: &str, path: &str, info: ErrorFieldInfo) {
        if !self.config.enabled {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= self.config.max_entries {
            return;
        }
        entries
            .entry((message.to_string(), path.to_string()))
            .or_insert(info);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Priority-ordered classifier from error messages to fields.
///
/// Detection is total: the built-in fallback rule matches every message.
#[derive(Debug, Clone)]
pub struct ErrorFieldDetector {
    rules: Vec<DetectionRule>,
    cache: Option<Arc<DetectorCache>>,
    /// The cache was injected by the caller rather than created here
    shared_cache: bool,
}

impl Default for ErrorFieldDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorFieldDetector {
    /// Detector with the built-in rule tiers and a private cache
    pub fn new() -> Self {
        Self {
            rules: builtin_rules().to_vec(),
            cache: Some(Arc::new(DetectorCache::default())),
            shared_cache: false,
        }
    }

    /// Detector with the built-in rules and no result cache
    pub fn uncached() -> Self {
        Self {
            rules: builtin_rules().to_vec(),
            cache: None,
            shared_cache: false,
        }
    }

    /// Use a cache shared with other detectors built from the same rules
    pub fn with_cache(mut self, cache: Arc<DetectorCache>) -> Self {
        self.cache = Some(cache);
        self.shared_cache = true;
        self
    }

    /// Add a rule. Rules stay sorted by priority; equal priorities keep
    /// insertion order.
    ///
    /// Cached answers were computed from the old rule set, so they are
    /// dropped. An injected cache is kept and cleared; a private one is
    /// replaced, since clones of this detector may still share it.
    pub fn with_rule(mut self, rule: DetectionRule) -> Self {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        if self.shared_cache {
            if let Some(cache) = &self.cache {
                cache.clear();
            }
        } else if self.cache.is_some() {
            self.cache = Some(Arc::new(DetectorCache::default()));
        }
        self
    }

    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// Name the field most likely responsible for `message` raised at `path`
    pub fn detect(&self, message: &str, path: &str) -> ErrorFieldInfo {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(message, path)) {
            return hit;
        }

        let info = self
            .rules
            .iter()
            .find_map(|rule| {
                rule.apply(message, path).map(|field| ErrorFieldInfo {
                    field,
                    path: path.to_string(),
                    confidence: rule.confidence,
                    reason: rule.name.clone(),
                })
            })
            .unwrap_or_else(|| ErrorFieldInfo {
                field: last_path_segment(path),
                path: path.to_string(),
                confidence: Confidence::Low,
                reason: "fallback".to_string(),
            });

        log::trace!("detected field {:?} via rule '{}' for '{}'", info.field, info.reason, message);

        if let Some(cache) = &self.cache {
            cache.insert(message, path, info.clone());
        }
        info
    }

    /// Detect for several `(message, path)` pairs at once
    pub fn detect_batch<'a, I>(&self, errors: I) -> Vec<ErrorFieldInfo>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        errors.into_iter().map(|(message, path)| self.detect(message, path)).collect()
    }
}
