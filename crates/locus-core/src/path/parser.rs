//! Path string parser
//!
//! Pointer and dot notation are split on their separators; Property Path,
//! JSONPath and jq share one small recursive descent over `.key`, `[n]` and
//! `["quoted key"]` accessors.
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::format::PathFormat;
use super::segment::{unescape_pointer_token, PathSegment};
use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::CharIndices;

/// Parser for a single path string in a known notation
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator with byte offsets
    chars: Peekable<CharIndices<'a>>,
    /// Notation being parsed
    format: PathFormat,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input and notation
    pub fn new(input: &'a str, format: PathFormat) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            format,
        }
    }

    /// Parse the whole input into segments
    pub fn parse(mut self) -> Result<Vec<PathSegment>> {
        match self.format {
            PathFormat::JsonPointer => self.parse_pointer(),
            PathFormat::DotNotation => self.parse_dot(),
            PathFormat::PropertyPath => self.parse_property(),
            PathFormat::JsonPath => self.parse_jsonpath(),
            PathFormat::Jq => self.parse_jq(),
        }
    }

    fn parse_pointer(&self) -> Result<Vec<PathSegment>> {
        if self.input.is_empty() {
            return Ok(Vec::new());
        }
        if !self.input.starts_with('/') {
            return Err(self.error_at("JSON Pointer must start with '/'", 0));
        }

        let mut segments = Vec::new();
        let mut offset = 1;
        for token in self.input[1..].split('/') {
            let unescaped = unescape_pointer_token(token).map_err(|i| {
                self.error_at("'~' must be followed by '0' or '1'", offset + i)
            })?;
            segments.push(PathSegment::from_token(&unescaped));
            offset += token.len() + 1;
        }
        Ok(segments)
    }

    fn parse_dot(&self) -> Result<Vec<PathSegment>> {
        if self.input.is_empty() {
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        let mut offset = 0;
        for token in self.input.split('.') {
            if token.is_empty() {
                return Err(self.error_at("empty segment", offset));
            }
            segments.push(PathSegment::from_token(token));
            offset += token.len() + 1;
        }
        Ok(segments)
    }

    fn parse_property(&mut self) -> Result<Vec<PathSegment>> {
        let mut segments = Vec::new();
        match self.current_char() {
            None => return Ok(segments),
            Some('[') => {}
            Some(_) => segments.push(self.parse_bare_key()?),
        }
        self.parse_accessors(&mut segments)?;
        Ok(segments)
    }

    fn parse_jsonpath(&mut self) -> Result<Vec<PathSegment>> {
        self.expect_char('$')?;
        let mut segments = Vec::new();
        self.parse_accessors(&mut segments)?;
        Ok(segments)
    }

    fn parse_jq(&mut self) -> Result<Vec<PathSegment>> {
        self.expect_char('.')?;
        let mut segments = Vec::new();
        match self.current_char() {
            None => return Ok(segments),
            Some('[') => {}
            Some('"') => segments.push(PathSegment::Key(self.parse_quoted()?)),
            Some(_) => segments.push(self.parse_bare_key()?),
        }
        self.parse_accessors(&mut segments)?;
        Ok(segments)
    }

    /// Parse a run of `.key`, `."key"`, `[n]` and `["key"]` accessors
    fn parse_accessors(&mut self, segments: &mut Vec<PathSegment>) -> Result<()> {
        while let Some(ch) = self.current_char() {
            match ch {
                '.' => {
                    self.advance();
                    match self.current_char() {
                        // `.[0]` (jq) - the bracket is handled on the next turn
                        Some('[') => {}
                        Some('"') => segments.push(PathSegment::Key(self.parse_quoted()?)),
                        Some('.') => return Err(self.error("recursive descent is not a concrete path")),
                        None => return Err(self.error("trailing '.'")),
                        Some(_) => segments.push(self.parse_bare_key()?),
                    }
                }
                '[' => segments.push(self.parse_bracket()?),
                other => {
                    return Err(self.error(format!("unexpected character '{}'", other)));
                }
            }
        }
        Ok(())
    }

    fn parse_bare_key(&mut self) -> Result<PathSegment> {
        let start = self.position();
        while let Some(ch) = self.current_char() {
            match ch {
                '.' | '[' => break,
                ']' => return Err(self.error("unexpected ']'")),
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.position();
        let input = self.input;
        let token = &input[start..end];
        if token.is_empty() {
            return Err(self.error_at("empty key", start));
        }
        if token == "*" {
            return Err(self.error_at("wildcards are not concrete paths", start));
        }
        Ok(PathSegment::from_token(token))
    }

    fn parse_bracket(&mut self) -> Result<PathSegment> {
        self.expect_char('[')?;

        if matches!(self.current_char(), Some('\'') | Some('"')) {
            let key = self.parse_quoted()?;
            self.expect_char(']')?;
            return Ok(PathSegment::Key(key));
        }

        let start = self.position();
        while let Some(ch) = self.current_char() {
            if ch == ']' {
                break;
            }
            self.advance();
        }
        let end = self.position();
        let input = self.input;
        let token = input[start..end].trim();
        self.expect_char(']')?;

        if token == "*" {
            return Err(self.error_at("wildcards are not concrete paths", start));
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error_at(
                format!("expected an array index or quoted key, found '{}'", token),
                start,
            ));
        }
        Ok(PathSegment::from_token(token))
    }

    /// Parse a single- or double-quoted key with backslash escapes
    fn parse_quoted(&mut self) -> Result<String> {
        let start = self.position();
        let quote = match self.advance() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_at("expected a quoted key", start)),
        };

        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error_at("unterminated quoted key", start)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{0008}',
                        Some('f') => '\u{000c}',
                        Some('u') => self.parse_unicode_escape()?,
                        Some(c) => c,
                        None => return Err(self.error_at("unterminated escape", start)),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let start = self.position();
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at("invalid \\u escape", start))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error_at("invalid \\u escape", start))
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.current_char() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len())
    }

    fn error(&mut self, message: impl Into<String>) -> Error {
        let position = self.position();
        self.error_at(message, position)
    }

    fn error_at(&self, message: impl Into<String>, position: usize) -> Error {
        Error::invalid_path(self.input, self.format, message, position)
    }
}
