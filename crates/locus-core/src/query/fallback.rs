//! In-process path evaluator used when no native engine is available
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::path::{PathConverter, PathFormat, PathSegment};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Segment(PathSegment),
    Wildcard,
}

/// Evaluates plain paths in any of the five notations, plus `[*]` and `.*`
/// wildcards, against a JSON value.
#[derive(Debug, Clone, Default)]
pub struct FallbackEvaluator {
    converter: PathConverter,
}

impl FallbackEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value the expression selects, in document order
    pub fn evaluate(&self, data: &Value, expression: &str) -> Result<Vec<Value>> {
        let steps = self.compile(expression)?;
        let mut current: Vec<&Value> = vec![data];

        for step in &steps {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match step {
                    Step::Segment(segment) => next.extend(select(value, segment)),
                    Step::Wildcard => match value {
                        Value::Object(map) => next.extend(map.values()),
                        Value::Array(items) => next.extend(items.iter()),
                        _ => {}
                    },
                }
            }
            if next.is_empty() {
                return Ok(Vec::new());
            }
            current = next;
        }

        Ok(current.into_iter().cloned().collect())
    }

    fn compile(&self, expression: &str) -> Result<Vec<Step>> {
        let format = PathFormat::detect(expression);
        let wildcards = if format == PathFormat::JsonPointer {
            Vec::new()
        } else {
            find_wildcards(expression)
        };

        let mut steps = Vec::new();
        let mut cursor = 0;
        for (index, (start, end)) in wildcards.iter().copied().enumerate() {
            let piece = &expression[cursor..start];
            steps.extend(self.parse_piece(piece, format, index > 0, expression)?);
            steps.push(Step::Wildcard);
            cursor = end;
        }
        let rest = &expression[cursor..];
        steps.extend(self.parse_piece(rest, format, !wildcards.is_empty(), expression)?);
        Ok(steps)
    }

    fn parse_piece(&self, piece: &str, format: PathFormat, rerooted: bool, expression: &str) -> Result<Vec<Step>> {
        if piece.is_empty() || (!rerooted && piece == format.root()) {
            return Ok(Vec::new());
        }
        let text = if rerooted { reroot(piece, format) } else { piece.to_string() };
        let segments = self
            .converter
            .parse_strict(&text, format)
            .map_err(|e| Error::query(expression, e.to_string()))?;
        Ok(segments.into_iter().map(Step::Segment).collect())
    }
}

fn select<'v>(value: &'v Value, segment: &PathSegment) -> Option<&'v Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Byte ranges of `[*]` and `.*` tokens outside quoted keys
fn find_wildcards(expression: &str) -> Vec<(usize, usize)> {
    let bytes = expression.as_bytes();
    let mut found = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' if bytes[i..].starts_with(b"[*]") => {
                found.push((i, i + 3));
                i += 3;
                continue;
            }
            b'.' if bytes.get(i + 1) == Some(&b'*')
                && matches!(bytes.get(i + 2), None | Some(b'.') | Some(b'[')) =>
            {
                found.push((i, i + 2));
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    found
}

/// Rewrite the text after a wildcard so it parses as a standalone path
fn reroot(piece: &str, format: PathFormat) -> String {
    match format {
        PathFormat::JsonPath => format!("${}", piece),
        PathFormat::Jq if piece.starts_with('[') => format!(".{}", piece),
        PathFormat::Jq => piece.to_string(),
        _ => piece.strip_prefix('.').unwrap_or(piece).to_string(),
    }
}
