//! Path segment algebra shared by the converter and the position map
//!
//! A path is an ordered list of [`PathSegment`]s. Every notation the
//! converter understands is rendered from, and parsed into, this one
//! intermediate form, so the escaping and index rules below are the single
//! source of truth for all of them.
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Whether a segment addresses an object member or an array element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Key,
    Index,
}

/// One step of a structural path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PathSegment {
    /// Object member name (already unescaped)
    Key(String),
    /// Array element position
    Index(usize),
}

impl PathSegment {
    /// Create a key segment
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Create an index segment
    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }

    /// Classify an untyped token.
    ///
    /// A token becomes an index only when the decimal rendering of the parsed
    /// integer is byte-for-byte the token itself, so `"01"`, `"+1"` and
    /// `"1.0"` all stay keys.
    pub fn from_token(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(n) if n.to_string() == raw => Self::Index(n),
            _ => Self::Key(raw.to_string()),
        }
    }

    /// Segment kind
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Key(_) => SegmentKind::Key,
            Self::Index(_) => SegmentKind::Index,
        }
    }

    /// The raw token this segment was (or would be) parsed from
    pub fn raw(&self) -> Cow<'_, str> {
        match self {
            Self::Key(k) => Cow::Borrowed(k.as_str()),
            Self::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Key(_) => None,
        }
    }

    /// Render as one JSON Pointer reference token (without the leading `/`)
    pub fn to_pointer_token(&self) -> Cow<'_, str> {
        match self {
            Self::Key(k) => escape_pointer_token(k),
            Self::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// Append this segment in Property Path notation (`a[0].b`, `a["x.y"]`)
    pub fn write_property(&self, out: &mut String) {
        match self {
            Self::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Self::Key(k) if is_bare_key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Self::Key(k) => {
                out.push('[');
                out.push_str(&quote_key(k, '"'));
                out.push(']');
            }
        }
    }

    /// Append this segment in JSONPath notation (`.a`, `[0]`, `['x.y']`)
    pub fn write_jsonpath(&self, out: &mut String) {
        match self {
            Self::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Self::Key(k) if is_bare_key(k) => {
                out.push('.');
                out.push_str(k);
            }
            Self::Key(k) => {
                out.push('[');
                out.push_str(&quote_key(k, '\''));
                out.push(']');
            }
        }
    }

    /// Append this segment in jq notation (`.a`, `[0]`, `.["x.y"]`)
    pub fn write_jq(&self, out: &mut String) {
        match self {
            Self::Index(i) => {
                if out.is_empty() {
                    out.push('.');
                }
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Self::Key(k) if is_jq_identifier(k) => {
                out.push('.');
                out.push_str(k);
            }
            Self::Key(k) => {
                out.push_str(".[");
                out.push_str(&quote_key(k, '"'));
                out.push(']');
            }
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{}", k),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Escape one JSON Pointer reference token.
///
/// RFC 6901 order: `~` becomes `~0` first, then `/` becomes `~1`.
pub fn escape_pointer_token(token: &str) -> Cow<'_, str> {
    if token.contains(&['~', '/'][..]) {
        Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Unescape one JSON Pointer reference token.
///
/// RFC 6901 order: `~1` becomes `/` first, then `~0` becomes `~`. Returns the
/// byte offset of the first `~` that is not followed by `0` or `1` as the
/// error.
pub fn unescape_pointer_token(token: &str) -> Result<Cow<'_, str>, usize> {
    if !token.contains('~') {
        return Ok(Cow::Borrowed(token));
    }

    let bytes = token.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'~' && !matches!(bytes.get(i + 1), Some(b'0') | Some(b'1')) {
            return Err(i);
        }
    }

    Ok(Cow::Owned(token.replace("~1", "/").replace("~0", "~")))
}

/// Render a full segment list as a JSON Pointer (`""` for the root)
pub fn segments_to_pointer(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.to_pointer_token());
    }
    out
}

/// Render a full segment list as a Property Path (`""` for the root)
pub fn segments_to_property_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.write_property(&mut out);
    }
    out
}

/// Whether a key can be written without brackets in Property Path and
/// JSONPath notation.
///
/// Canonical integers are excluded so that `a["0"]` is never confused with
/// `a[0]`, and leading sigils are excluded so format detection stays stable.
pub fn is_bare_key(key: &str) -> bool {
    let Some(first) = key.chars().next() else {
        return false;
    };
    if matches!(first, '$' | '/' | '.' | '@' | '*') {
        return false;
    }
    if PathSegment::from_token(key).is_index() {
        return false;
    }
    key.chars()
        .all(|c| !matches!(c, '.' | '[' | ']' | '"' | '\'' | '\\') && !c.is_whitespace())
}

/// Whether a key is a plain jq identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_jq_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote a key with the given quote character, backslash-escaping the quote,
/// backslashes and control characters.
pub fn quote_key(key: &str, quote: char) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    out.push(quote);
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_disambiguation() {
        assert_eq!(PathSegment::from_token("0"), PathSegment::Index(0));
        assert_eq!(PathSegment::from_token("42"), PathSegment::Index(42));
        assert_eq!(PathSegment::from_token("01"), PathSegment::key("01"));
        assert_eq!(PathSegment::from_token("+1"), PathSegment::key("+1"));
        assert_eq!(PathSegment::from_token("-1"), PathSegment::key("-1"));
        assert_eq!(PathSegment::from_token(""), PathSegment::key(""));
        assert_eq!(PathSegment::from_token("name"), PathSegment::key("name"));
    }

    #[test]
    fn test_raw_round_trips_through_from_token() {
        for seg in [PathSegment::Index(7), PathSegment::key("01"), PathSegment::key("x")] {
            assert_eq!(PathSegment::from_token(&seg.raw()), seg);
        }
    }

    #[test]
    fn test_pointer_escaping_order() {
        assert_eq!(escape_pointer_token("a/b~c"), "a~1b~0c");
        assert_eq!(escape_pointer_token("~1"), "~01");
        assert_eq!(unescape_pointer_token("a~1b~0c").unwrap(), "a/b~c");
        // "~01" must decode to the literal "~1", not to "/"
        assert_eq!(unescape_pointer_token("~01").unwrap(), "~1");
        assert_eq!(unescape_pointer_token("plain").unwrap(), "plain");
    }

    #[test]
    fn test_unescape_rejects_bad_escape() {
        assert_eq!(unescape_pointer_token("a~2"), Err(1));
        assert_eq!(unescape_pointer_token("~"), Err(0));
    }

    #[test]
    fn test_bare_key_rules() {
        assert!(is_bare_key("name"));
        assert!(is_bare_key("user-id"));
        assert!(!is_bare_key(""));
        assert!(!is_bare_key("a.b"));
        assert!(!is_bare_key("0"));
        assert!(is_bare_key("01"));
        assert!(!is_bare_key("$ref"));
        assert!(!is_bare_key("has space"));
    }

    #[test]
    fn test_property_rendering() {
        let segments = vec![
            PathSegment::key("a"),
            PathSegment::Index(0),
            PathSegment::key("b.c"),
            PathSegment::key("0"),
        ];
        assert_eq!(segments_to_property_path(&segments), r#"a[0]["b.c"]["0"]"#);
        assert_eq!(segments_to_pointer(&segments), "/a/0/b.c/0");
    }

    #[test]
    fn test_jq_rendering() {
        let mut out = String::new();
        PathSegment::Index(3).write_jq(&mut out);
        PathSegment::key("name").write_jq(&mut out);
        PathSegment::key("x-y").write_jq(&mut out);
        assert_eq!(out, r#".[3].name.["x-y"]"#);
    }

    #[test]
    fn test_quote_key_escapes() {
        assert_eq!(quote_key("it's", '\''), r"'it\'s'");
        assert_eq!(quote_key(r#"a"b"#, '"'), r#""a\"b""#);
        assert_eq!(quote_key("a\\b", '"'), r#""a\\b""#);
    }
}
