//! Conversion between path notations
//!
//! Every conversion goes through the shared segment list: the source string
//! is parsed (declared or detected notation first, Property Path as a
//! best-effort second attempt) and the segments are rendered into the target.
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::cache::{CachedConversion, ConversionCache};
use super::format::PathFormat;
use super::parser::Parser;
use super::segment::{segments_to_pointer, segments_to_property_path, PathSegment};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Path as supplied
    pub source: String,
    /// Converted path
    pub result: String,
    /// Notation the source was actually parsed as
    pub source_format: PathFormat,
    /// Requested notation
    pub target_format: PathFormat,
    /// Whether the result came from the conversion cache
    pub cached: bool,
    /// Set when the declared/detected notation failed and the best-effort
    /// Property Path parse was used instead
    pub error: Option<String>,
}

/// Converts paths between JSON Pointer, Property Path, JSONPath, jq and dot notation
#[derive(Debug, Clone, Default)]
pub struct PathConverter {
    cache: Option<Arc<ConversionCache>>,
}

impl PathConverter {
    /// Create a converter without a cache
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Create a converter that shares the given cache
    pub fn with_cache(cache: Arc<ConversionCache>) -> Self {
        Self { cache: Some(cache) }
    }

    /// The injected cache, if any
    pub fn cache(&self) -> Option<&Arc<ConversionCache>> {
        self.cache.as_ref()
    }

    /// Parse a path strictly in one notation (no fallback)
    pub fn parse_strict(&self, path: &str, format: PathFormat) -> Result<Vec<PathSegment>> {
        Parser::new(path, format).parse()
    }

    /// Parse a path, detecting its notation when `format` is `None`.
    ///
    /// If the declared or detected notation fails, a Property Path parse is
    /// attempted before giving up; the original error is returned when both
    /// fail.
    pub fn parse(&self, path: &str, format: Option<PathFormat>) -> Result<Vec<PathSegment>> {
        self.parse_with_fallback(path, format).map(|parsed| parsed.segments)
    }

    /// Render segments in the requested notation
    pub fn render(&self, segments: &[PathSegment], format: PathFormat) -> String {
        match format {
            PathFormat::JsonPointer => segments_to_pointer(segments),
            PathFormat::PropertyPath => segments_to_property_path(segments),
            PathFormat::JsonPath => {
                let mut out = String::from("$");
                for segment in segments {
                    segment.write_jsonpath(&mut out);
                }
                out
            }
            PathFormat::Jq => {
                let mut out = String::new();
                for segment in segments {
                    segment.write_jq(&mut out);
                }
                if out.is_empty() {
                    out.push('.');
                }
                out
            }
            PathFormat::DotNotation => segments
                .iter()
                .map(|segment| segment.raw())
                .collect::<Vec<_>>()
                .join("."),
        }
    }

    /// Convert a path (notation detected) into `target`
    pub fn convert(&self, path: &str, target: PathFormat) -> Result<ConversionResult> {
        self.convert_from(path, None, target)
    }

    /// Convert a path from a declared (or detected, when `None`) notation into `target`
    pub fn convert_from(
        &self,
        path: &str,
        source: Option<PathFormat>,
        target: PathFormat,
    ) -> Result<ConversionResult> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(path, source, target) {
                return Ok(ConversionResult {
                    source: path.to_string(),
                    result: hit.result,
                    source_format: hit.source_format,
                    target_format: target,
                    cached: true,
                    error: None,
                });
            }
        }

        let parsed = self.parse_with_fallback(path, source)?;
        let result = self.render(&parsed.segments, target);
        if target == PathFormat::DotNotation {
            self.check_dot_reads_back(path, &parsed.segments, &result)?;
        }

        // Only clean conversions are remembered so `error` is never lost on a hit
        if parsed.primary_error.is_none() {
            if let Some(cache) = &self.cache {
                cache.insert(
                    path,
                    source,
                    target,
                    CachedConversion {
                        result: result.clone(),
                        source_format: parsed.format,
                    },
                );
            }
        }

        Ok(ConversionResult {
            source: path.to_string(),
            result,
            source_format: parsed.format,
            target_format: target,
            cached: false,
            error: parsed.primary_error.map(|e| e.to_string()),
        })
    }

    pub fn to_pointer(&self, path: &str) -> Result<String> {
        self.convert(path, PathFormat::JsonPointer).map(|r| r.result)
    }

    pub fn to_property_path(&self, path: &str) -> Result<String> {
        self.convert(path, PathFormat::PropertyPath).map(|r| r.result)
    }

    pub fn to_jsonpath(&self, path: &str) -> Result<String> {
        self.convert(path, PathFormat::JsonPath).map(|r| r.result)
    }

    pub fn to_jq(&self, path: &str) -> Result<String> {
        self.convert(path, PathFormat::Jq).map(|r| r.result)
    }

    pub fn to_dot(&self, path: &str) -> Result<String> {
        self.convert(path, PathFormat::DotNotation).map(|r| r.result)
    }

    /// Canonical Property Path form, used as a stable cache key elsewhere
    pub fn normalize(&self, path: &str) -> Result<String> {
        self.to_property_path(path)
    }

    /// Whether `path` parses cleanly in `format` (detected when `None`).
    ///
    /// No best-effort fallback is applied: this is a pre-flight check for
    /// caller-supplied paths.
    pub fn validate(&self, path: &str, format: Option<PathFormat>) -> bool {
        let format = format.unwrap_or_else(|| PathFormat::detect(path));
        self.parse_strict(path, format).is_ok()
    }

    /// Parent of a path in the same notation; the root is its own parent
    pub fn parent(&self, path: &str) -> Result<String> {
        let parsed = self.parse_with_fallback(path, None)?;
        let mut segments = parsed.segments;
        segments.pop();
        Ok(self.render(&segments, parsed.format))
    }

    /// Last segment of a path, `None` for the root
    pub fn last_segment(&self, path: &str) -> Result<Option<PathSegment>> {
        let mut segments = self.parse(path, None)?;
        Ok(segments.pop())
    }

    /// Append one segment to a path, keeping its notation
    pub fn join(&self, base: &str, segment: &PathSegment) -> Result<String> {
        let parsed = self.parse_with_fallback(base, None)?;
        let mut segments = parsed.segments;
        segments.push(segment.clone());
        Ok(self.render(&segments, parsed.format))
    }

    /// Dot notation has no quoting: empty keys, keys containing `.` or `[`,
    /// and a leading `/`, `$` or `.` all read back as a different path.
    fn check_dot_reads_back(&self, source: &str, segments: &[PathSegment], rendered: &str) -> Result<()> {
        match self.parse_strict(rendered, PathFormat::detect(rendered)) {
            Ok(back) if segments_to_pointer(&back) == segments_to_pointer(segments) => Ok(()),
            _ => {
                log::debug!("dot rendering '{}' of '{}' does not read back", rendered, source);
                Err(Error::invalid_path(
                    source,
                    PathFormat::DotNotation,
                    format!("'{}' would not read back as the same path; use another notation", rendered),
                    0,
                ))
            }
        }
    }

    fn parse_with_fallback(&self, path: &str, format: Option<PathFormat>) -> Result<ParsedPath> {
        let format = format.unwrap_or_else(|| PathFormat::detect(path));
        match self.parse_strict(path, format) {
            Ok(segments) => Ok(ParsedPath {
                segments,
                format,
                primary_error: None,
            }),
            Err(primary) if format != PathFormat::PropertyPath => {
                match self.parse_strict(path, PathFormat::PropertyPath) {
                    Ok(segments) => {
                        log::debug!("'{}' parsed as property path after {} parse failed: {}", path, format, primary);
                        Ok(ParsedPath {
                            segments,
                            format: PathFormat::PropertyPath,
                            primary_error: Some(primary),
                        })
                    }
                    Err(_) => Err(primary),
                }
            }
            Err(primary) => Err(primary),
        }
    }
}

struct ParsedPath {
    segments: Vec<PathSegment>,
    format: PathFormat,
    primary_error: Option<Error>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_between_all_formats() {
        let converter = PathConverter::new();
        let path = "/items/0/name";
        assert_eq!(converter.to_property_path(path).unwrap(), "items[0].name");
        assert_eq!(converter.to_jsonpath(path).unwrap(), "$.items[0].name");
        assert_eq!(converter.to_jq(path).unwrap(), ".items[0].name");
        assert_eq!(converter.to_dot(path).unwrap(), "items.0.name");
        assert_eq!(converter.to_pointer("$.items[0].name").unwrap(), path);
        assert_eq!(converter.to_pointer(".items[0].name").unwrap(), path);
        assert_eq!(converter.to_pointer("items.0.name").unwrap(), path);
        assert_eq!(converter.to_pointer("items[0].name").unwrap(), path);
    }

    #[test]
    fn test_root_in_every_format() {
        let converter = PathConverter::new();
        assert_eq!(converter.convert("", PathFormat::JsonPath).unwrap().result, "$");
        assert_eq!(converter.convert("$", PathFormat::Jq).unwrap().result, ".");
        assert_eq!(converter.convert(".", PathFormat::JsonPointer).unwrap().result, "");
        assert_eq!(converter.convert("", PathFormat::DotNotation).unwrap().result, "");
    }

    #[test]
    fn test_escaping_key_with_reserved_characters() {
        let converter = PathConverter::new();
        let segments = vec![PathSegment::key("a/b~c")];
        assert_eq!(converter.render(&segments, PathFormat::JsonPointer), "/a~1b~0c");
        assert_eq!(converter.parse("/a~1b~0c", None).unwrap(), segments);
    }

    #[test]
    fn test_dot_rejects_keys_it_cannot_express() {
        let converter = PathConverter::new();
        // `/x` would be read back as a pointer
        assert!(converter.to_dot("/~1x").is_err());
        assert!(converter.to_dot("/~1x/a").is_err());
        // a slash after the first key is harmless
        assert_eq!(converter.to_dot("/a/~1x").unwrap(), "a./x");
        assert!(converter.to_dot(r#"["a.b"].c"#).is_err());
        assert!(converter.to_dot(r#"a[""].c"#).is_err());
        assert!(converter.to_dot(r#"a["$x"]"#).is_ok());
        assert!(converter.to_dot(r#"["$x"].a"#).is_err());
        assert!(converter.to_dot(r#"["x[0]"]"#).is_err());

        let err = converter.convert("/~1x", PathFormat::DotNotation).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { format: PathFormat::DotNotation, .. }));
        assert_eq!(converter.to_dot("/a/0/b").unwrap(), "a.0.b");
    }

    #[test]
    fn test_leading_zero_key_is_not_an_index() {
        let converter = PathConverter::new();
        let segments = converter.parse("/list/01", None).unwrap();
        assert_eq!(segments[1], PathSegment::key("01"));
        assert_eq!(converter.to_property_path("/list/01").unwrap(), "list.01");
        assert_eq!(converter.to_pointer("list.01").unwrap(), "/list/01");
    }

    #[test]
    fn test_best_effort_fallback_records_error() {
        let converter = PathConverter::new();
        // Invalid pointer escape, but a legal (single key) property path
        let result = converter.convert("/a~2", PathFormat::JsonPointer).unwrap();
        assert_eq!(result.source_format, PathFormat::PropertyPath);
        assert!(result.error.is_some());
        assert_eq!(result.result, "/~1a~02");
    }

    #[test]
    fn test_failure_when_both_parses_fail() {
        let converter = PathConverter::new();
        assert!(converter.convert("$..a", PathFormat::JsonPointer).is_err());
        assert!(converter.convert("a[", PathFormat::JsonPointer).is_err());
    }

    #[test]
    fn test_validate_has_no_fallback() {
        let converter = PathConverter::new();
        assert!(converter.validate("/a/b", None));
        assert!(!converter.validate("/a~2", None));
        assert!(converter.validate("a[0]", Some(PathFormat::PropertyPath)));
        assert!(!converter.validate("a[0", None));
    }

    #[test]
    fn test_normalize() {
        let converter = PathConverter::new();
        for input in ["/a/0/b", "$.a[0].b", ".a[0].b", "a.0.b", "a[0].b"] {
            assert_eq!(converter.normalize(input).unwrap(), "a[0].b");
        }
    }

    #[test]
    fn test_parent_last_and_join() {
        let converter = PathConverter::new();
        assert_eq!(converter.parent("/a/0/b").unwrap(), "/a/0");
        assert_eq!(converter.parent("$.a").unwrap(), "$");
        assert_eq!(converter.parent("").unwrap(), "");
        assert_eq!(converter.last_segment("a[2]").unwrap(), Some(PathSegment::Index(2)));
        assert_eq!(converter.last_segment("").unwrap(), None);
        assert_eq!(converter.join("a", &PathSegment::Index(1)).unwrap(), "a[1]");
        assert_eq!(converter.join("/a", &PathSegment::key("b")).unwrap(), "/a/b");
    }

    #[test]
    fn test_cache_hits() {
        let cache = Arc::new(ConversionCache::new());
        let converter = PathConverter::with_cache(Arc::clone(&cache));
        let first = converter.convert("/a/b", PathFormat::PropertyPath).unwrap();
        let second = converter.convert("/a/b", PathFormat::PropertyPath).unwrap();
        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.result, second.result);
        assert_eq!(second.source_format, PathFormat::JsonPointer);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_quoted_keys_survive_every_bracketed_format() {
        let converter = PathConverter::new();
        let segments = vec![PathSegment::key("a.b"), PathSegment::key("it's"), PathSegment::key("0")];
        for format in [PathFormat::PropertyPath, PathFormat::JsonPath, PathFormat::Jq] {
            let rendered = converter.render(&segments, format);
            assert_eq!(converter.parse(&rendered, None).unwrap(), segments, "format {}", format);
        }
    }
}
