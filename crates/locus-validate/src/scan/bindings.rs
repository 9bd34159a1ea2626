//! Data-binding scan
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use locus_core::path::segments_to_pointer;
use locus_core::{PathSegment, PositionMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What a binding expression refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    State,
    Data,
    Computed,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::State => write!(f, "state"),
            BindingKind::Data => write!(f, "data"),
            BindingKind::Computed => write!(f, "computed"),
        }
    }
}

/// Reserved markers, in no particular order
pub const BINDING_MARKERS: [(&str, BindingKind); 3] = [
    ("$state.", BindingKind::State),
    ("$data.", BindingKind::Data),
    ("$computed.", BindingKind::Computed),
];

/// Kind of binding a string carries. With several markers the earliest one decides.
pub fn classify_binding(text: &str) -> Option<BindingKind> {
    BINDING_MARKERS
        .iter()
        .filter_map(|(marker, kind)| text.find(marker).map(|at| (at, *kind)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, kind)| kind)
}

/// One string value containing a binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBinding {
    pub pointer: String,
    pub kind: BindingKind,
    pub expression: String,
    pub line: usize,
}

/// Binding counts for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBindingStats {
    pub total: usize,
    pub state: usize,
    pub data: usize,
    pub computed: usize,
    pub bindings: Vec<DataBinding>,
}

impl DataBindingStats {
    fn add(&mut self, binding: DataBinding) {
        self.total += 1;
        match binding.kind {
            BindingKind::State => self.state += 1,
            BindingKind::Data => self.data += 1,
            BindingKind::Computed => self.computed += 1,
        }
        self.bindings.push(binding);
    }
}

/// Walk every string value and classify the ones carrying a binding marker
pub fn scan_data_bindings(value: &Value, positions: &PositionMap) -> DataBindingStats {
    let mut stats = DataBindingStats::default();
    let mut trail = Vec::new();
    walk(value, &mut trail, positions, &mut stats);
    log::debug!(
        "binding scan: {} total ({} state, {} data, {} computed)",
        stats.total,
        stats.state,
        stats.data,
        stats.computed
    );
    stats
}

fn walk(value: &Value, trail: &mut Vec<PathSegment>, positions: &PositionMap, stats: &mut DataBindingStats) {
    match value {
        Value::String(text) => {
            if let Some(kind) = classify_binding(text) {
                let pointer = segments_to_pointer(trail);
                let line = positions.get_line_number(&pointer);
                stats.add(DataBinding {
                    pointer,
                    kind,
                    expression: text.clone(),
                    line,
                });
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                trail.push(PathSegment::Index(index));
                walk(item, trail, positions, stats);
                trail.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                trail.push(PathSegment::Key(key.clone()));
                walk(item, trail, positions, stats);
                trail.pop();
            }
        }
        _ => {}
    }
}
