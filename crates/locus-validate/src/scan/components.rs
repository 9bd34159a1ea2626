//! Component and version scan
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key naming a component's type
pub const TYPE_KEY: &str = "type";
/// Key holding a platform → support-state map
pub const PLATFORMS_KEY: &str = "platforms";
/// Key holding a component version string
pub const VERSION_KEY: &str = "version";

/// Component tallies for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVersionStats {
    pub total_components: usize,
    pub by_type: BTreeMap<String, usize>,
    /// platform → support state → count
    pub platforms: BTreeMap<String, BTreeMap<String, usize>>,
    pub versions: BTreeMap<String, usize>,
}

impl ComponentVersionStats {
    /// Number of components whose support state on `platform` is `state`
    pub fn platform_count(&self, platform: &str, state: &str) -> usize {
        self.platforms
            .get(platform)
            .and_then(|states| states.get(state))
            .copied()
            .unwrap_or(0)
    }

    fn record(&mut self, component_type: &str, object: &Map<String, Value>) {
        self.total_components += 1;
        *self.by_type.entry(component_type.to_string()).or_default() += 1;

        if let Some(Value::Object(platforms)) = object.get(PLATFORMS_KEY) {
            for (platform, state) in platforms {
                if let Some(state) = state.as_str() {
                    *self
                        .platforms
                        .entry(platform.clone())
                        .or_default()
                        .entry(state.to_string())
                        .or_default() += 1;
                }
            }
        }

        if let Some(version) = object.get(VERSION_KEY).and_then(version_text) {
            *self.versions.entry(version).or_default() += 1;
        }
    }
}

fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Every object with a string `type` member counts as one component
pub fn scan_components(value: &Value) -> ComponentVersionStats {
    let mut stats = ComponentVersionStats::default();
    let mut pending = vec![value];

    while let Some(current) = pending.pop() {
        match current {
            Value::Object(object) => {
                if let Some(component_type) = object.get(TYPE_KEY).and_then(Value::as_str) {
                    stats.record(component_type, object);
                }
                pending.extend(object.values());
            }
            Value::Array(items) => pending.extend(items.iter()),
            _ => {}
        }
    }

    log::debug!(
        "component scan: {} components, {} distinct types",
        stats.total_components,
        stats.by_type.len()
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_tallies() {
        let doc = json!({
            "type": "Screen",
            "version": "2.1",
            "children": [
                {"type": "Button", "platforms": {"web": "supported", "ios": "deprecated"}, "version": "1.0"},
                {"type": "Button", "platforms": {"web": "unsupported"}},
                {"type": "Map", "platforms": {"web": "unsupported", "android": "beta"}, "version": 3}
            ]
        });
        let stats = scan_components(&doc);

        assert_eq!(stats.total_components, 4);
        assert_eq!(stats.by_type["Button"], 2);
        assert_eq!(stats.by_type["Screen"], 1);
        assert_eq!(stats.platform_count("web", "unsupported"), 2);
        assert_eq!(stats.platform_count("web", "supported"), 1);
        assert_eq!(stats.platform_count("ios", "deprecated"), 1);
        assert_eq!(stats.platform_count("android", "stable"), 0);
        assert_eq!(stats.versions["2.1"], 1);
        assert_eq!(stats.versions["3"], 1);
    }

    #[test]
    fn test_non_string_type_is_not_a_component() {
        let doc = json!({"type": 5, "items": [{"type": null}, {"kind": "Button"}]});
        assert_eq!(scan_components(&doc), ComponentVersionStats::default());
    }

    #[test]
    fn test_malformed_platforms_are_skipped() {
        let doc = json!({"type": "Chart", "platforms": ["web"]});
        let stats = scan_components(&doc);
        assert_eq!(stats.total_components, 1);
        assert!(stats.platforms.is_empty());
    }
}
