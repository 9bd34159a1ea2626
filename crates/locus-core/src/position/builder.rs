//! Single-pass position map builder
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license
//!
//! The builder walks the source text once, character by character, keeping an
//! explicit stack of open containers. It never fails: malformed or truncated
//! input yields whatever positions were recorded before the damage.

use super::map::{PositionInfo, PositionMap};
use crate::path::{segments_to_property_path, PathSegment};
use serde::{Deserialize, Serialize};

/// Options for [`PositionMapBuilder`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Containers nested deeper than this are scanned but not recorded
    pub max_depth: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Builds a [`PositionMap`] from raw JSON text
#[derive(Debug, Clone, Default)]
pub struct PositionMapBuilder {
    options: BuilderOptions,
}

impl PositionMapBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Scan `source` and record the position of every key and array element
    pub fn build(&self, source: &str) -> PositionMap {
        let mut scanner = Scanner::new(source, self.options.max_depth);
        scanner.run();
        scanner.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// Segment of the child currently being scanned
    child: Option<PathSegment>,
    /// Next element index (arrays only)
    index: usize,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            child: None,
            index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

/// A string that may turn out to be a key once its `:` is seen
#[derive(Debug)]
struct PendingKey {
    start: Mark,
    end: usize,
}

#[derive(Debug, Default)]
struct StringState {
    start: Option<Mark>,
    escaped: bool,
    key_candidate: bool,
}

struct Scanner<'a> {
    source: &'a str,
    max_depth: usize,
    map: PositionMap,
    frames: Vec<Frame>,
    /// Containers opened beyond `max_depth`
    overflow: usize,
    line: usize,
    column: usize,
    last_significant: Option<char>,
    string: StringState,
    pending_key: Option<PendingKey>,
    pending_element: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, max_depth: usize) -> Self {
        Self {
            source,
            max_depth,
            map: PositionMap::default(),
            frames: Vec::new(),
            overflow: 0,
            line: 1,
            column: 1,
            last_significant: None,
            string: StringState::default(),
            pending_key: None,
            pending_element: false,
        }
    }

    fn run(&mut self) {
        let source = self.source;
        for (offset, ch) in source.char_indices() {
            let mark = Mark {
                offset,
                line: self.line,
                column: self.column,
            };

            if self.string.start.is_some() {
                self.scan_string_char(ch, offset);
            } else if !ch.is_whitespace() {
                self.scan_structural(ch, mark);
            }

            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn finish(self) -> PositionMap {
        if self.string.start.is_some() || !self.frames.is_empty() {
            log::debug!(
                "position scan ended early: {} open container(s), unterminated string: {}",
                self.frames.len(),
                self.string.start.is_some()
            );
        }
        self.map
    }

    fn scan_string_char(&mut self, ch: char, offset: usize) {
        if self.string.escaped {
            self.string.escaped = false;
            return;
        }
        match ch {
            '\\' => self.string.escaped = true,
            '"' => {
                let state = std::mem::take(&mut self.string);
                if let (Some(start), true) = (state.start, state.key_candidate) {
                    self.pending_key = Some(PendingKey { start, end: offset });
                }
                self.last_significant = Some('"');
            }
            _ => {}
        }
    }

    fn scan_structural(&mut self, ch: char, mark: Mark) {
        if self.pending_element {
            self.pending_element = false;
            if ch != ']' {
                self.start_element(mark);
            }
        }
        if ch != ':' {
            self.pending_key = None;
        }

        match ch {
            '"' => {
                let key_candidate = self.overflow == 0
                    && self.top_kind() == Some(FrameKind::Object)
                    && matches!(self.last_significant, Some('{') | Some(','));
                self.string = StringState {
                    start: Some(mark),
                    escaped: false,
                    key_candidate,
                };
            }
            ':' => {
                if let Some(pending) = self.pending_key.take() {
                    self.confirm_key(pending);
                }
            }
            '{' => {
                self.open(FrameKind::Object);
            }
            '[' => {
                if self.open(FrameKind::Array) {
                    self.pending_element = true;
                }
            }
            '}' => self.close(FrameKind::Object, mark),
            ']' => self.close(FrameKind::Array, mark),
            ',' => {
                if self.overflow == 0 {
                    if let Some(frame) = self.frames.last_mut() {
                        frame.child = None;
                        if frame.kind == FrameKind::Array {
                            frame.index += 1;
                            self.pending_element = true;
                        }
                    }
                }
            }
            _ => {}
        }

        if ch != '"' {
            self.last_significant = Some(ch);
        }
    }

    fn top_kind(&self) -> Option<FrameKind> {
        self.frames.last().map(|f| f.kind)
    }

    /// Returns whether the container was tracked
    fn open(&mut self, kind: FrameKind) -> bool {
        if self.overflow > 0 || self.frames.len() >= self.max_depth {
            self.overflow += 1;
            return false;
        }
        self.frames.push(Frame::new(kind));
        true
    }

    fn close(&mut self, kind: FrameKind, mark: Mark) {
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        match self.frames.pop() {
            Some(frame) if frame.kind != kind => {
                log::debug!("mismatched closer at line {}, column {}", mark.line, mark.column);
            }
            Some(_) => {}
            None => {
                log::debug!("unbalanced closer at line {}, column {}", mark.line, mark.column);
            }
        }
        self.pending_element = false;
    }

    fn start_element(&mut self, mark: Mark) {
        if self.overflow > 0 {
            return;
        }
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        if frame.kind != FrameKind::Array {
            return;
        }
        frame.child = Some(PathSegment::Index(frame.index));
        self.record(mark, None);
    }

    fn confirm_key(&mut self, pending: PendingKey) {
        let raw = &self.source[pending.start.offset..=pending.end];
        let key = serde_json::from_str::<String>(raw)
            .unwrap_or_else(|_| raw[1..raw.len() - 1].to_string());
        let length = raw.chars().count();

        match self.frames.last_mut() {
            Some(frame) if frame.kind == FrameKind::Object => {
                frame.child = Some(PathSegment::Key(key));
            }
            _ => return,
        }
        self.record(pending.start, Some(length));
    }

    fn record(&mut self, mark: Mark, length: Option<usize>) {
        let segments: Vec<PathSegment> = self.frames.iter().filter_map(|f| f.child.clone()).collect();
        if segments.len() != self.frames.len() {
            // an enclosing container has no current child; nothing sensible to record
            return;
        }
        let parent_path = if segments.len() > 1 {
            Some(segments_to_property_path(&segments[..segments.len() - 1]))
        } else {
            None
        };
        self.map.record(
            &segments,
            PositionInfo {
                line: mark.line,
                column: mark.column,
                offset: mark.offset,
                length,
                parent_path,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::MatchConfidence;

    fn build(source: &str) -> PositionMap {
        PositionMapBuilder::default().build(source)
    }

    #[test]
    fn test_multiline_document() {
        let source = "{\n  \"name\": \"demo\",\n  \"items\": [\n    {\"id\": 1},\n    {\"id\": 2}\n  ]\n}";
        let map = build(source);

        let name = map.get_position_info("name");
        assert_eq!((name.line, name.column, name.length), (2, 3, Some(6)));

        let second = map.get_position_info("items[1]");
        assert_eq!((second.line, second.column), (5, 5));
        assert_eq!(second.length, None);

        let id = map.get_position_info("/items/1/id");
        assert_eq!((id.line, id.column), (5, 6));
        assert_eq!(id.parent_path.as_deref(), Some("items[1]"));
    }

    #[test]
    fn test_string_values_are_not_keys() {
        let map = build(r#"{"a": "b", "c": ["d", "e:f"], "g": {"h": "i"}}"#);
        let paths: Vec<_> = map.paths().collect();
        assert_eq!(paths, vec!["a", "c", "c[0]", "c[1]", "g", "g.h"]);
    }

    #[test]
    fn test_escaped_keys_are_decoded() {
        let map = build(r#"{"we\"ird": 1, "sl/ash": 2, "t~il": 3}"#);
        assert!(map.contains_pointer("/we\"ird"));
        assert!(map.contains_pointer("/sl~1ash"));
        assert!(map.contains_pointer("/t~0il"));
        assert_eq!(map.get_position_info("/we\"ird").length, Some(9));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let map = build("{\"a\": 1,\n\"a\": 2}");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_line_number("a"), 1);
    }

    #[test]
    fn test_nested_arrays() {
        let map = build("[[1, 2], [], [3]]");
        let paths: Vec<_> = map.paths().collect();
        assert_eq!(paths, vec!["[0]", "[0][0]", "[0][1]", "[1]", "[2]", "[2][0]"]);
    }

    #[test]
    fn test_trailing_comma_records_nothing_extra() {
        let map = build("[1, 2, ]");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_malformed_input_is_partial() {
        let map = build(r#"{"a": {"b": [1, "#);
        assert!(map.contains_path("a.b[0]"));
        assert_eq!(map.find_by_path("a.b[1]").confidence, MatchConfidence::Parent);

        let map = build("}}]] {\"ok\": 1}");
        assert!(map.contains_path("ok"));

        assert!(build("").is_empty());
        assert!(build("\"unterminated").is_empty());
    }

    #[test]
    fn test_max_depth_stops_recording() {
        let builder = PositionMapBuilder::new(BuilderOptions { max_depth: 2 });
        let map = builder.build(r#"{"a": {"b": {"c": 1}}, "d": 2}"#);
        assert!(map.contains_path("a"));
        assert!(map.contains_path("a.b"));
        assert!(!map.contains_path("a.b.c"));
        assert!(map.contains_path("d"));
    }

    #[test]
    fn test_offsets_are_bytes_columns_are_chars() {
        let map = build("{\"é\": 1, \"x\": 2}");
        let x = map.get_position_info("x");
        // `é` is two bytes
        assert_eq!(x.offset, 10);
        assert_eq!(x.column, 10);
    }

    #[test]
    fn test_build_is_deterministic() {
        let source = r#"{"a": [1, {"b": 2}], "c": {"d": [true, null]}}"#;
        let first = build(source);
        let second = build(source);
        assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn test_objects_nested_in_arrays_open_their_own_scope() {
        let map = build(r#"{"list": [{"k": {"v": 1}}, {"k": 2}]}"#);
        let paths: Vec<_> = map.paths().collect();
        assert_eq!(paths, vec!["list", "list[0]", "list[0].k", "list[0].k.v", "list[1]", "list[1].k"]);
        assert_eq!(map.find_by_pointer("/list/1/k").confidence, MatchConfidence::Exact);
    }
}
