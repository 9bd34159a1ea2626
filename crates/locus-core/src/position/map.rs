//! Position map and its query surface
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::builder::{BuilderOptions, PositionMapBuilder};
use crate::error::Result;
use crate::path::{segments_to_pointer, segments_to_property_path, PathConverter, PathFormat, PathSegment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Source location of one recorded path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// One-based line number
    pub line: usize,
    /// One-based column number, counted in characters
    pub column: usize,
    /// Zero-based byte offset
    pub offset: usize,
    /// Span of the key token in characters, quotes included (keys only)
    pub length: Option<usize>,
    /// Property Path of the enclosing container (absent at the top level)
    pub parent_path: Option<String>,
}

impl PositionInfo {
    /// The top of the document, used whenever nothing better is known
    pub fn start_of_document() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
            length: None,
            parent_path: None,
        }
    }
}

/// How closely a lookup matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    /// No recorded path was related to the query
    None,
    /// The nearest recorded ancestor (or nested entry) was used
    Parent,
    /// The queried path itself was recorded
    Exact,
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchConfidence::None => write!(f, "none"),
            MatchConfidence::Parent => write!(f, "parent"),
            MatchConfidence::Exact => write!(f, "exact"),
        }
    }
}

/// Result of a position lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMatch {
    pub position: Option<PositionInfo>,
    pub confidence: MatchConfidence,
    /// The recorded path (in the query's notation family) that produced the match
    pub matched: Option<String>,
}

impl PositionMatch {
    fn none() -> Self {
        Self {
            position: None,
            confidence: MatchConfidence::None,
            matched: None,
        }
    }

    fn found(entry: &PositionEntry, confidence: MatchConfidence, matched: &str) -> Self {
        Self {
            position: Some(entry.info.clone()),
            confidence,
            matched: Some(matched.to_string()),
        }
    }

    /// Line of the match, or line 1 when nothing matched
    pub fn line(&self) -> usize {
        self.position.as_ref().map(|p| p.line).unwrap_or(1)
    }
}

/// One recorded path with its canonical pointer and property path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEntry {
    pub pointer: String,
    pub path: String,
    pub info: PositionInfo,
}

/// Read-only index from structural paths to source positions.
///
/// Built once per source text by [`PositionMapBuilder`] and never mutated
/// afterwards. Entries are kept in source order.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    entries: Vec<PositionEntry>,
    by_pointer: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
    /// property-path prefix -> every entry recorded at or below it
    nested: HashMap<String, Vec<usize>>,
}

impl PositionMap {
    /// Build a map with default builder options
    pub fn build(source: &str) -> Self {
        PositionMapBuilder::new(BuilderOptions::default()).build(source)
    }

    /// Record one path. The first record for a path wins.
    pub(crate) fn record(&mut self, segments: &[PathSegment], info: PositionInfo) {
        let pointer = segments_to_pointer(segments);
        if self.by_pointer.contains_key(&pointer) {
            return;
        }
        let path = segments_to_property_path(segments);
        let index = self.entries.len();

        self.by_pointer.insert(pointer.clone(), index);
        self.by_path.insert(path.clone(), index);

        let mut prefix = String::new();
        for segment in segments {
            segment.write_property(&mut prefix);
            self.nested.entry(prefix.clone()).or_default().push(index);
        }

        self.entries.push(PositionEntry { pointer, path, info });
    }

    /// Number of recorded paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in source order
    pub fn entries(&self) -> &[PositionEntry] {
        &self.entries
    }

    /// Recorded property paths in source order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn contains_pointer(&self, pointer: &str) -> bool {
        self.by_pointer.contains_key(pointer)
    }

    /// Exact pointer lookup, stripping trailing segments until an ancestor matches
    pub fn find_by_pointer(&self, pointer: &str) -> PositionMatch {
        if let Some(&index) = self.by_pointer.get(pointer) {
            return PositionMatch::found(&self.entries[index], MatchConfidence::Exact, pointer);
        }

        let mut current = pointer;
        while let Some(cut) = current.rfind('/') {
            current = &current[..cut];
            if let Some(&index) = self.by_pointer.get(current) {
                return PositionMatch::found(&self.entries[index], MatchConfidence::Parent, current);
            }
        }

        PositionMatch::none()
    }

    /// Property Path lookup: exact, then nearest recorded ancestor, then the
    /// longest prefix known to the nested cache.
    ///
    /// Any notation is accepted; it is normalized to a Property Path first.
    pub fn find_by_path(&self, path: &str) -> PositionMatch {
        let segments = match PathConverter::new().parse(path, None) {
            Ok(segments) => segments,
            Err(_) => {
                return match self.by_path.get(path) {
                    Some(&index) => PositionMatch::found(&self.entries[index], MatchConfidence::Exact, path),
                    None => PositionMatch::none(),
                };
            }
        };

        let canonical = segments_to_property_path(&segments);
        if let Some(&index) = self.by_path.get(&canonical) {
            return PositionMatch::found(&self.entries[index], MatchConfidence::Exact, &canonical);
        }

        for len in (1..segments.len()).rev() {
            let ancestor = segments_to_property_path(&segments[..len]);
            if let Some(&index) = self.by_path.get(&ancestor) {
                return PositionMatch::found(&self.entries[index], MatchConfidence::Parent, &ancestor);
            }
        }

        for len in (1..=segments.len()).rev() {
            let prefix = segments_to_property_path(&segments[..len]);
            if let Some(&index) = self.nested.get(&prefix).and_then(|hits| hits.first()) {
                return PositionMatch::found(&self.entries[index], MatchConfidence::Parent, &prefix);
            }
        }

        PositionMatch::none()
    }

    /// Look up a pointer (leading `/`) or any other path notation
    pub fn find(&self, path_or_pointer: &str) -> PositionMatch {
        if PathFormat::detect(path_or_pointer) == PathFormat::JsonPointer {
            self.find_by_pointer(path_or_pointer)
        } else {
            self.find_by_path(path_or_pointer)
        }
    }

    /// Line number for a path or pointer; line 1 when nothing matches
    pub fn get_line_number(&self, path_or_pointer: &str) -> usize {
        self.find(path_or_pointer).line()
    }

    /// Position for a path or pointer; the start of the document when nothing matches
    pub fn get_position_info(&self, path_or_pointer: &str) -> PositionInfo {
        self.find(path_or_pointer)
            .position
            .unwrap_or_else(PositionInfo::start_of_document)
    }

    /// Every entry recorded at or below a Property Path prefix, in source order
    pub fn descendants(&self, path: &str) -> Vec<&PositionEntry> {
        self.nested
            .get(path)
            .map(|hits| hits.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// The last entry starting at or before a byte offset
    pub fn find_by_offset(&self, offset: usize) -> Option<&PositionEntry> {
        let after = self.entries.partition_point(|e| e.info.offset <= offset);
        after.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Convert a path in any notation to a JSON Pointer
    pub fn path_to_pointer(&self, path: &str) -> Result<String> {
        PathConverter::new().to_pointer(path)
    }

    /// Convert a JSON Pointer to a Property Path
    pub fn pointer_to_path(&self, pointer: &str) -> Result<String> {
        PathConverter::new()
            .convert_from(pointer, Some(PathFormat::JsonPointer), PathFormat::PropertyPath)
            .map(|r| r.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"a":{"b":[1,2,3]}}"#;

    #[test]
    fn test_exact_array_element() {
        let map = PositionMap::build(SAMPLE);
        let found = map.find_by_path("a.b[1]");
        assert_eq!(found.confidence, MatchConfidence::Exact);
        let info = found.position.unwrap();
        assert_eq!(info.line, 1);
        // `2` is the 14th character
        assert_eq!(info.column, 14);
        assert_eq!(info.offset, 13);
        assert_eq!(info.parent_path.as_deref(), Some("a.b"));
    }

    #[test]
    fn test_key_positions_and_length() {
        let map = PositionMap::build(SAMPLE);
        let a = map.find_by_pointer("/a").position.unwrap();
        assert_eq!((a.line, a.column, a.offset, a.length), (1, 2, 1, Some(3)));
        assert_eq!(a.parent_path, None);
    }

    #[test]
    fn test_parent_fallback() {
        let map = PositionMap::build(SAMPLE);
        let found = map.find_by_path("a.b[1].missing");
        assert_eq!(found.confidence, MatchConfidence::Parent);
        assert_eq!(found.matched.as_deref(), Some("a.b[1]"));

        let found = map.find_by_pointer("/a/zzz");
        assert_eq!(found.confidence, MatchConfidence::Parent);
        assert_eq!(found.matched.as_deref(), Some("/a"));
    }

    #[test]
    fn test_no_match() {
        let map = PositionMap::build(SAMPLE);
        assert_eq!(map.find_by_path("nope").confidence, MatchConfidence::None);
        assert_eq!(map.find_by_pointer("/nope/deeper").confidence, MatchConfidence::None);
        assert_eq!(map.get_line_number("/nope"), 1);
        assert_eq!(map.get_position_info("nope"), PositionInfo::start_of_document());
    }

    #[test]
    fn test_any_notation_is_accepted() {
        let map = PositionMap::build(SAMPLE);
        for query in ["a.b[2]", "$.a.b[2]", ".a.b[2]", "a.b.2", "/a/b/2"] {
            assert_eq!(map.find(query).confidence, MatchConfidence::Exact, "query {}", query);
        }
    }

    #[test]
    fn test_descendants_and_offsets() {
        let map = PositionMap::build(SAMPLE);
        let under_b: Vec<_> = map.descendants("a.b").iter().map(|e| e.path.clone()).collect();
        assert_eq!(under_b, vec!["a.b", "a.b[0]", "a.b[1]", "a.b[2]"]);
        assert_eq!(map.find_by_offset(13).unwrap().path, "a.b[1]");
        assert_eq!(map.find_by_offset(0), None);
    }

    #[test]
    fn test_wrappers_agree_with_converter() {
        let map = PositionMap::build(SAMPLE);
        assert_eq!(map.path_to_pointer("a.b[1]").unwrap(), "/a/b/1");
        assert_eq!(map.pointer_to_path("/a/b/1").unwrap(), "a.b[1]");
        for entry in map.entries() {
            assert_eq!(map.pointer_to_path(&entry.pointer).unwrap(), entry.path);
            assert_eq!(map.path_to_pointer(&entry.path).unwrap(), entry.pointer);
        }
    }
}
