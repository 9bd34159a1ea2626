//! Property tests for report invariants

use locus_validate::{IssueCategory, Orchestrator, PlatformSupportPlugin};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_state() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["stable", "beta", "experimental", "deprecated", "unsupported"])
}

fn arb_component() -> impl Strategy<Value = Value> {
    (
        prop::sample::select(vec!["Button", "Map", "Text", "Video"]),
        arb_state(),
        arb_state(),
        prop::option::of("[a-z]{1,8}"),
    )
        .prop_map(|(kind, web, ios, binding)| {
            let mut component = json!({"type": kind, "platforms": {"web": web, "ios": ios}});
            if let Some(name) = binding {
                component["label"] = Value::from(format!("$state.{name}"));
            }
            component
        })
}

proptest! {
    #[test]
    fn prop_malformed_text_yields_single_parse_error(text in "[\\[\\]{}:,\" a-z0-9]{0,40}") {
        prop_assume!(serde_json::from_str::<Value>(&text).is_err());
        let report = Orchestrator::default().validate("fuzz.json", &text).unwrap();
        prop_assert!(!report.valid);
        prop_assert_eq!(report.errors.len(), 1);
        prop_assert_eq!(report.errors[0].category, IssueCategory::ParseError);
        prop_assert_eq!(report.errors[0].line, 1);
    }

    #[test]
    fn prop_report_invariants(children in prop::collection::vec(arb_component(), 0..8)) {
        let document = json!({"type": "Screen", "children": children});
        let text = serde_json::to_string_pretty(&document).unwrap();
        let orchestrator = Orchestrator::default().with_plugin(PlatformSupportPlugin::new());
        let report = orchestrator.validate("screen.json", &text).unwrap();

        prop_assert_eq!(report.valid, report.errors.is_empty());
        prop_assert!(report.errors.iter().all(|i| i.is_error()));
        prop_assert!(report.warnings.iter().all(|i| !i.is_error()));
        prop_assert!((0.0..=100.0).contains(&report.web_compatibility.score));
        prop_assert_eq!(report.web_compatibility.total, report.issue_count());

        let unsupported = children.iter().filter(|c| c["platforms"]["web"] == "unsupported").count();
        prop_assert_eq!(report.errors.len(), unsupported);

        let labelled = children.iter().filter(|c| c.get("label").is_some()).count();
        prop_assert_eq!(report.data_binding_stats.as_ref().unwrap().state, labelled);
        prop_assert_eq!(report.component_version_stats.as_ref().unwrap().total_components, children.len() + 1);

        for issue in report.issues() {
            prop_assert!(issue.line > 1);
            prop_assert!(issue.component.is_some());
        }
    }
}
