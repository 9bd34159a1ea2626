//! End-to-end validation through the orchestrator

use locus_validate::{
    FnPlugin, IssueCategory, JsonSchemaPlugin, Orchestrator, OrchestratorConfig, PlatformSupportPlugin, Severity,
    ValidateError, ValidationReport,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::thread;

const SCREEN: &str = r#"{
  "type": "Screen",
  "version": "2.0",
  "title": "$data.page.title",
  "children": [
    {
      "type": "Button",
      "label": "$state.cta",
      "platforms": {"web": "beta", "ios": "deprecated"}
    },
    {
      "type": "Map",
      "platforms": {"web": "unsupported", "android": "stable"}
    },
    {
      "type": "Text",
      "size": "large"
    }
  ]
}"#;

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["type", "children"],
        "properties": {
            "children": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["type"],
                    "properties": {"size": {"type": "integer"}}
                }
            }
        }
    })
}

fn orchestrator() -> Orchestrator {
    Orchestrator::default()
        .with_plugin(JsonSchemaPlugin::from_value(&schema()).unwrap())
        .with_plugin(PlatformSupportPlugin::new())
}

#[test]
fn test_report_combines_plugins_and_scans() {
    let report = orchestrator().validate("screens/home.json", SCREEN).unwrap();

    assert!(!report.valid);
    assert_eq!(report.file_path, "screens/home.json");

    // size is a string but must be an integer
    let schema_error = report
        .errors
        .iter()
        .find(|i| i.category == IssueCategory::Schema)
        .unwrap();
    assert_eq!(schema_error.pointer, "/children/2/size");
    assert_eq!(schema_error.line, 17);
    assert_eq!(schema_error.path, "children[2].size");

    let web_error = report
        .errors
        .iter()
        .find(|i| i.category == IssueCategory::WebCompatibility)
        .unwrap();
    assert_eq!(web_error.component.as_deref(), Some("Map"));
    assert_eq!(web_error.line, 13);

    assert_eq!(report.errors.len(), 2);
    assert_eq!(report.warnings.len(), 2);
    assert!(report
        .warnings
        .iter()
        .any(|i| i.severity == Severity::Info && i.component.as_deref() == Some("Button")));

    // only the unsupported Map counts against the web; the beta Button does not
    assert_eq!(report.web_compatibility.incompatible, 1);
    assert!((report.web_compatibility.score - 75.0).abs() < 1e-9);

    let bindings = report.data_binding_stats.as_ref().unwrap();
    assert_eq!(bindings.total, 2);
    let cta = bindings.bindings.iter().find(|b| b.pointer == "/children/0/label").unwrap();
    assert_eq!(cta.line, 8);

    let components = report.component_version_stats.as_ref().unwrap();
    assert_eq!(components.total_components, 4);
    assert_eq!(components.versions["2.0"], 1);
    assert_eq!(components.platform_count("ios", "deprecated"), 1);
}

#[test]
fn test_report_serializes_for_tooling() {
    let report = orchestrator().validate("home.json", SCREEN).unwrap();
    let text = serde_json::to_string(&report).unwrap();
    let back: ValidationReport = serde_json::from_str(&text).unwrap();
    assert_eq!(back.errors, report.errors);
    assert_eq!(back.valid, report.valid);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["errors"][0]["severity"], "error");
    assert!(value["validated_at"].is_string());
}

#[test]
fn test_invalid_json_never_reaches_plugins() {
    let report = orchestrator().validate("broken.json", "{\"type\": \"Screen\",, }").unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].category, IssueCategory::ParseError);
    assert_eq!(report.issue_count(), 1);
}

#[test]
fn test_schema_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "type: object").unwrap();
    writeln!(file, "properties:").unwrap();
    writeln!(file, "  version:").unwrap();
    writeln!(file, "    type: integer").unwrap();

    let orchestrator = Orchestrator::default().with_plugin(JsonSchemaPlugin::from_file(file.path()).unwrap());
    let report = orchestrator.validate("home.json", SCREEN).unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].pointer, "/version");
    assert_eq!(report.errors[0].line, 3);
    assert_eq!(report.errors[0].field.as_deref(), Some("version"));
}

#[test]
fn test_plugin_errors_are_not_swallowed() {
    let orchestrator = orchestrator().with_plugin(FnPlugin::new("lookup", |_| {
        Err(anyhow::anyhow!("registry unreachable").context("loading component registry"))
    }));
    match orchestrator.validate("home.json", SCREEN) {
        Err(ValidateError::Plugin { plugin, source }) => {
            assert_eq!(plugin, "lookup");
            assert_eq!(source.root_cause().to_string(), "registry unreachable");
        }
        other => panic!("expected plugin error, got {other:?}"),
    }
}

#[test]
fn test_shared_across_threads() {
    let config = OrchestratorConfig::default().with_position_cache(true);
    let orchestrator = Arc::new(Orchestrator::new(config).with_plugin(PlatformSupportPlugin::new()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let orchestrator = Arc::clone(&orchestrator);
            thread::spawn(move || {
                let report = orchestrator.validate(&format!("screen-{i}.json"), SCREEN).unwrap();
                (report.errors.len(), report.errors[0].line)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (1, 13));
    }
    let stats = orchestrator.position_cache().unwrap().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 4);
}
