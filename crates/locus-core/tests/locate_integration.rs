//! End-to-end lookups: converter, position map and detector working together

use locus_core::{
    Confidence, ConversionCache, ErrorFieldDetector, MatchConfidence, PathConverter, PathFormat, PositionMap,
    PositionMapCache, QueryMethod, QueryRunner,
};
use std::sync::Arc;
use std::thread;

const SCREEN: &str = r#"{
  "type": "Screen",
  "title": "Settings",
  "children": [
    {
      "type": "Toggle",
      "label": "Dark mode",
      "platforms": {"web": "stable", "ios": "beta"}
    },
    {
      "type": "Slider",
      "range": [0, 100],
      "value": "$state.volume"
    }
  ]
}"#;

#[test]
fn locates_paths_in_every_notation() {
    let map = PositionMap::build(SCREEN);
    let converter = PathConverter::new();

    for path in [
        "children[1].range[1]",
        "$.children[1].range[1]",
        ".children[1].range[1]",
        "children.1.range.1",
        "/children/1/range/1",
    ] {
        let hit = map.find(path);
        assert_eq!(hit.confidence, MatchConfidence::Exact, "{}", path);
        assert_eq!(hit.line(), 12, "{}", path);

        let pointer = converter.to_pointer(path).unwrap();
        assert_eq!(pointer, "/children/1/range/1");
    }
}

#[test]
fn error_raised_on_missing_child_points_at_parent() {
    let map = PositionMap::build(SCREEN);
    let detector = ErrorFieldDetector::new();

    let pointer = "/children/0/icon";
    let field = detector.detect("'icon' is a required property", pointer);
    assert_eq!(field.field.as_deref(), Some("icon"));
    assert_eq!(field.confidence, Confidence::High);

    let hit = map.find_by_pointer(pointer);
    assert_eq!(hit.confidence, MatchConfidence::Parent);
    assert_eq!(hit.matched.as_deref(), Some("/children/0"));
    assert_eq!(hit.line(), 5);
}

#[test]
fn nested_platform_map_is_recorded() {
    let map = PositionMap::build(SCREEN);
    let web = map.get_position_info("children[0].platforms.web");
    assert_eq!(web.line, 8);
    assert_eq!(web.parent_path.as_deref(), Some("children[0].platforms"));

    let under: Vec<_> = map.descendants("children[0].platforms").iter().map(|e| e.path.clone()).collect();
    assert_eq!(
        under,
        vec!["children[0].platforms", "children[0].platforms.web", "children[0].platforms.ios"]
    );
}

#[test]
fn shared_conversion_cache_across_threads() {
    let cache = Arc::new(ConversionCache::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let converter = PathConverter::with_cache(cache);
                (0..50)
                    .map(|i| converter.convert(&format!("items[{}].name", i % 10), PathFormat::Jq).unwrap().result)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0][3], ".items[3].name");
    assert_eq!(cache.len(), 10);
}

#[test]
fn position_cache_shares_maps_between_threads() {
    let cache = Arc::new(PositionMapCache::default());
    let maps: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get_or_build(SCREEN, None))
        })
        .map(|h| h.join().unwrap())
        .collect();
    assert!(maps.iter().all(|m| m.entries() == maps[0].entries()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn query_runner_over_parsed_document() {
    let value: serde_json::Value = serde_json::from_str(SCREEN).unwrap();
    let runner = QueryRunner::new();
    let result = runner.query(&value, "$.children[*].type");
    assert_eq!(result.method, QueryMethod::Fallback);
    assert_eq!(result.data, vec![serde_json::json!("Toggle"), serde_json::json!("Slider")]);
}
