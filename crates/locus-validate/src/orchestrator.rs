//! The validator orchestrator
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::error::{ValidateError, ValidateResult};
use crate::issue::{IssueCategory, ValidationIssue};
use crate::plugin::ValidatorPlugin;
use crate::report::ValidationReport;
use crate::scan::{scan_components, scan_data_bindings};
use locus_core::{
    BuilderOptions, CacheConfig, ConversionCache, ErrorFieldDetector, PathConverter, PositionMap,
    PositionMapBuilder, PositionMapCache,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

const POSITION_CACHE_ENTRIES: usize = 64;

/// Orchestrator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Texts larger than this are rejected with a single `SIZE_LIMIT` error
    pub max_source_bytes: usize,
    /// Containers nested deeper than this are not recorded in the position map
    pub max_depth: usize,
    pub binding_scan: bool,
    pub component_scan: bool,
    /// Reuse position maps for identical content across calls
    pub cache_positions: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: 10 * 1024 * 1024,
            max_depth: 512,
            binding_scan: true,
            component_scan: true,
            cache_positions: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_max_source_bytes(mut self, max_source_bytes: usize) -> Self {
        self.max_source_bytes = max_source_bytes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_binding_scan(mut self, enabled: bool) -> Self {
        self.binding_scan = enabled;
        self
    }

    pub fn with_component_scan(mut self, enabled: bool) -> Self {
        self.component_scan = enabled;
        self
    }

    pub fn with_position_cache(mut self, enabled: bool) -> Self {
        self.cache_positions = enabled;
        self
    }
}

/// Runs one document through parsing, position mapping, every registered
/// plugin and the built-in scans, producing a [`ValidationReport`].
///
/// The orchestrator holds no per-document state and can be shared across
/// threads.
pub struct Orchestrator {
    config: OrchestratorConfig,
    plugins: Vec<Box<dyn ValidatorPlugin>>,
    converter: PathConverter,
    detector: ErrorFieldDetector,
    builder: PositionMapBuilder,
    position_cache: Option<PositionMapCache>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("plugins", &self.plugin_names())
            .field("position_cache", &self.position_cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        let builder = PositionMapBuilder::new(BuilderOptions {
            max_depth: config.max_depth,
        });
        let position_cache = config.cache_positions.then(|| {
            let cache_config = CacheConfig {
                max_entries: POSITION_CACHE_ENTRIES,
                enabled: true,
            };
            PositionMapCache::with_builder(cache_config, builder.clone())
        });

        Self {
            converter: PathConverter::with_cache(Arc::new(ConversionCache::new())),
            detector: ErrorFieldDetector::new(),
            builder,
            position_cache,
            plugins: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Builder-style plugin registration
    pub fn with_plugin(mut self, plugin: impl ValidatorPlugin + 'static) -> Self {
        self.register(Box::new(plugin));
        self
    }

    /// Replace the Error Field Detector, e.g. one carrying custom rules
    pub fn with_detector(mut self, detector: ErrorFieldDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn register(&mut self, plugin: Box<dyn ValidatorPlugin>) {
        log::debug!("registered validator plugin '{}'", plugin.name());
        self.plugins.push(plugin);
    }

    /// Names of the registered plugins, in run order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn converter(&self) -> &PathConverter {
        &self.converter
    }

    pub fn position_cache(&self) -> Option<&PositionMapCache> {
        self.position_cache.as_ref()
    }

    /// Validate already-read text labelled with `file_path`.
    ///
    /// Problems in the document end up in the report. `Err` is returned only
    /// when a plugin fails.
    pub fn validate(&self, file_path: &str, text: &str) -> ValidateResult<ValidationReport> {
        self.run(file_path, text, None)
    }

    /// Read and validate a file; its modification time keys the position cache
    pub fn validate_file(&self, path: impl AsRef<Path>) -> ValidateResult<ValidationReport> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ValidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok();
        self.run(&path.display().to_string(), &text, modified)
    }

    /// Validate several documents in order, stopping at the first plugin failure
    pub fn validate_batch<P, T>(&self, documents: &[(P, T)]) -> ValidateResult<Vec<ValidationReport>>
    where
        P: AsRef<str>,
        T: AsRef<str>,
    {
        documents
            .iter()
            .map(|(path, text)| self.validate(path.as_ref(), text.as_ref()))
            .collect()
    }

    fn run(&self, file_path: &str, text: &str, modified: Option<SystemTime>) -> ValidateResult<ValidationReport> {
        let started = Instant::now();

        if text.len() > self.config.max_source_bytes {
            log::warn!(
                "{file_path}: {} bytes exceeds the {} byte limit",
                text.len(),
                self.config.max_source_bytes
            );
            let issue = ValidationIssue::error(
                IssueCategory::SizeLimit,
                format!(
                    "Document is {} bytes, larger than the {} byte limit",
                    text.len(),
                    self.config.max_source_bytes
                ),
            )
            .with_context(json!({ "size": text.len(), "limit": self.config.max_source_bytes }));
            return Ok(ValidationReport::fatal(file_path, issue, started.elapsed()));
        }

        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(error) => {
                log::debug!("{file_path}: not valid JSON: {error}");
                let issue = ValidationIssue::error(IssueCategory::ParseError, format!("Invalid JSON: {error}"))
                    .with_context(json!({ "line": error.line(), "column": error.column() }));
                return Ok(ValidationReport::fatal(file_path, issue, started.elapsed()));
            }
        };

        let positions = match &self.position_cache {
            Some(cache) => cache.get_or_build(text, modified),
            None => Arc::new(self.builder.build(text)),
        };

        let mut issues = Vec::new();
        for plugin in &self.plugins {
            let mut ctx = self.context(file_path, text, &value, &positions);
            let found = plugin.validate(&mut ctx).map_err(|source| ValidateError::Plugin {
                plugin: plugin.name().to_string(),
                source,
            })?;
            log::debug!("{file_path}: plugin '{}' reported {} issue(s)", plugin.name(), found.len());
            issues.extend(found);
        }

        let bindings = self
            .config
            .binding_scan
            .then(|| scan_data_bindings(&value, &positions));
        let components = self.config.component_scan.then(|| scan_components(&value));

        let report = ValidationReport::from_issues(file_path, issues, bindings, components, started.elapsed());
        log::debug!(
            "{file_path}: {} error(s), {} warning(s) in {:.2}ms",
            report.errors.len(),
            report.warnings.len(),
            report.validation_time_ms
        );
        Ok(report)
    }

    fn context<'a>(
        &'a self,
        file_path: &'a str,
        text: &'a str,
        value: &'a Value,
        positions: &'a PositionMap,
    ) -> ValidationContext<'a> {
        ValidationContext::new(file_path, text, value, positions, &self.converter, &self.detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use crate::plugin::FnPlugin;
    use crate::plugins::PlatformSupportPlugin;

    const SCREEN: &str = r#"{
  "type": "Screen",
  "title": "$data.page.title",
  "children": [
    {"type": "Map", "platforms": {"web": "unsupported"}},
    {"type": "Text", "value": "$state.count"}
  ]
}"#;

    #[test]
    fn test_parse_failure_short_circuits() {
        let orchestrator = Orchestrator::default().with_plugin(FnPlugin::new("never", |_| {
            anyhow::bail!("plugins must not run on unparseable input")
        }));
        let report = orchestrator.validate("broken.json", "{\"a\": [1, 2,\n").unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.is_empty());
        let error = &report.errors[0];
        assert_eq!(error.category, IssueCategory::ParseError);
        assert_eq!((error.line, error.column), (1, 1));
        assert!(error.context.as_ref().unwrap()["line"].is_number());
        assert!(report.data_binding_stats.is_none());
    }

    #[test]
    fn test_size_guard() {
        let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_max_source_bytes(8));
        let report = orchestrator.validate("big.json", r#"{"key": "value"}"#).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].category, IssueCategory::SizeLimit);
        assert_eq!(report.errors[0].line, 1);
        assert!(report.component_version_stats.is_none());
    }

    #[test]
    fn test_full_pipeline() {
        let orchestrator = Orchestrator::default().with_plugin(PlatformSupportPlugin::new());
        let report = orchestrator.validate("screen.json", SCREEN).unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, 5);
        assert_eq!(report.web_compatibility.score, 0.0);

        let bindings = report.data_binding_stats.as_ref().unwrap();
        assert_eq!((bindings.total, bindings.state, bindings.data), (2, 1, 1));
        let components = report.component_version_stats.as_ref().unwrap();
        assert_eq!(components.total_components, 3);
        assert_eq!(components.platform_count("web", "unsupported"), 1);
    }

    #[test]
    fn test_scans_can_be_disabled() {
        let config = OrchestratorConfig::default()
            .with_binding_scan(false)
            .with_component_scan(false);
        let report = Orchestrator::new(config).validate("screen.json", SCREEN).unwrap();
        assert!(report.valid);
        assert_eq!(report.web_compatibility.score, 100.0);
        assert!(report.data_binding_stats.is_none());
        assert!(report.component_version_stats.is_none());
    }

    #[test]
    fn test_plugin_failure_propagates() {
        let orchestrator = Orchestrator::default()
            .with_plugin(PlatformSupportPlugin::new())
            .with_plugin(FnPlugin::new("flaky", |_| Err(anyhow::anyhow!("rule table missing"))));
        assert_eq!(orchestrator.plugin_names(), vec!["platform-support", "flaky"]);

        let error = orchestrator.validate("screen.json", SCREEN).unwrap_err();
        assert_eq!(error.plugin_name(), Some("flaky"));
        assert!(error.to_string().contains("rule table missing"));
    }

    #[test]
    fn test_each_plugin_gets_a_fresh_breadcrumb() {
        let orchestrator = Orchestrator::default()
            .with_plugin(FnPlugin::new("wanders", |ctx| {
                ctx.enter_key("children");
                Ok(Vec::new())
            }))
            .with_plugin(FnPlugin::new("root", |ctx| {
                Ok(vec![ctx.issue(IssueCategory::Plugin, Severity::Info, "checked")])
            }));
        let report = orchestrator.validate("screen.json", SCREEN).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].pointer, "");
    }

    #[test]
    fn test_position_cache_is_reused() {
        let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_position_cache(true));
        orchestrator.validate("a.json", SCREEN).unwrap();
        orchestrator.validate("b.json", SCREEN).unwrap();
        let stats = orchestrator.position_cache().unwrap().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_batch_and_file() {
        let orchestrator = Orchestrator::default();
        let reports = orchestrator
            .validate_batch(&[("ok.json", "{}"), ("bad.json", "{")])
            .unwrap();
        assert!(reports[0].valid);
        assert!(!reports[1].valid);

        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), SCREEN).unwrap();
        let report = orchestrator.validate_file(file.path()).unwrap();
        assert!(report.valid);
        assert!(report.file_path.ends_with(&*file.path().file_name().unwrap().to_string_lossy()));

        let missing = orchestrator.validate_file("/no/such/screen.json").unwrap_err();
        assert!(matches!(missing, ValidateError::Io { .. }));
    }

    #[test]
    fn test_orchestrator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Orchestrator>();
    }

    #[test]
    fn test_debug_lists_plugins() {
        let orchestrator = Orchestrator::default().with_plugin(PlatformSupportPlugin::new());
        let rendered = format!("{orchestrator:?}");
        assert!(rendered.starts_with("Orchestrator {"));
        assert!(rendered.contains("\"platform-support\""));
        assert!(rendered.contains("max_source_bytes: 10485760"));
    }

    #[test]
    fn test_config_defaults_from_partial_yaml() {
        let config: OrchestratorConfig = serde_yaml::from_str("max_depth: 16\ncache_positions: true").unwrap();
        assert_eq!(config.max_depth, 16);
        assert!(config.cache_positions);
        assert_eq!(config.max_source_bytes, 10 * 1024 * 1024);
        assert!(config.binding_scan);
    }
}
