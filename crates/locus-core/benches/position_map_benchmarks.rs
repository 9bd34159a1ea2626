//! Benchmarks for position map construction, lookups and path conversion
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use locus_core::{ErrorFieldDetector, PathConverter, PathFormat, PositionMap};
use serde_json::{json, Value};

fn create_large_document(items: usize) -> String {
    let mut children = Vec::with_capacity(items);
    for i in 0..items {
        children.push(json!({
            "id": i,
            "type": if i % 3 == 0 { "Text" } else if i % 3 == 1 { "Button" } else { "Image" },
            "props": {"label": format!("Item {}", i), "visible": i % 2 == 0},
            "platforms": {"web": "stable", "ios": "beta"}
        }));
    }
    let doc: Value = json!({"type": "Screen", "children": children});
    serde_json::to_string_pretty(&doc).unwrap_or_default()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_map_build");
    for size in [10usize, 100, 1000] {
        let source = create_large_document(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| PositionMap::build(black_box(source)))
        });
    }
    group.finish();
}

fn bench_lookups(c: &mut Criterion) {
    let source = create_large_document(1000);
    let map = PositionMap::build(&source);

    c.bench_function("find_by_pointer_exact", |b| {
        b.iter(|| map.find_by_pointer(black_box("/children/500/props/label")))
    });
    c.bench_function("find_by_path_parent_fallback", |b| {
        b.iter(|| map.find_by_path(black_box("children[500].props.missing.deeper")))
    });
}

fn bench_conversion(c: &mut Criterion) {
    let converter = PathConverter::new();
    let mut group = c.benchmark_group("path_conversion");
    for target in [PathFormat::JsonPointer, PathFormat::JsonPath, PathFormat::Jq] {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &target| {
            b.iter(|| converter.convert(black_box("children[42].props[\"data-id\"]"), target))
        });
    }
    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let detector = ErrorFieldDetector::uncached();
    c.bench_function("detect_required_property", |b| {
        b.iter(|| detector.detect(black_box("\"label\" is a required property"), black_box("/children/3/props")))
    });
    c.bench_function("detect_fallback", |b| {
        b.iter(|| detector.detect(black_box("something unusual happened"), black_box("/children/3/props")))
    });
}

criterion_group!(benches, bench_build, bench_lookups, bench_conversion, bench_detection);
criterion_main!(benches);
