//! Path notations and format detection
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five path notations the converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathFormat {
    /// RFC 6901 JSON Pointer: `/a/0/b`
    JsonPointer,
    /// Property Path: `a[0].b`
    PropertyPath,
    /// JSONPath: `$.a[0].b`
    JsonPath,
    /// jq-style: `.a[0].b`
    Jq,
    /// Dot notation: `a.0.b`
    DotNotation,
}

impl PathFormat {
    /// All formats, in detection priority order
    pub const ALL: [PathFormat; 5] = [
        PathFormat::JsonPointer,
        PathFormat::JsonPath,
        PathFormat::Jq,
        PathFormat::DotNotation,
        PathFormat::PropertyPath,
    ];

    /// Guess the notation of a path string.
    ///
    /// Leading `/` is a pointer, leading `$` is JSONPath, leading `.` is jq,
    /// a dotted string without brackets is dot notation, and anything else is
    /// a Property Path.
    pub fn detect(path: &str) -> Self {
        if path.starts_with('/') {
            PathFormat::JsonPointer
        } else if path.starts_with('$') {
            PathFormat::JsonPath
        } else if path.starts_with('.') {
            PathFormat::Jq
        } else if !path.contains('[') && path.contains('.') {
            PathFormat::DotNotation
        } else {
            PathFormat::PropertyPath
        }
    }

    /// Short name used on the command line and in serialized results
    pub fn name(&self) -> &'static str {
        match self {
            PathFormat::JsonPointer => "pointer",
            PathFormat::PropertyPath => "property",
            PathFormat::JsonPath => "jsonpath",
            PathFormat::Jq => "jq",
            PathFormat::DotNotation => "dot",
        }
    }

    /// How the root path is written in this notation
    pub fn root(&self) -> &'static str {
        match self {
            PathFormat::JsonPath => "$",
            PathFormat::Jq => ".",
            _ => "",
        }
    }
}

impl fmt::Display for PathFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pointer" | "json-pointer" | "json_pointer" => Ok(PathFormat::JsonPointer),
            "property" | "property-path" | "property_path" => Ok(PathFormat::PropertyPath),
            "jsonpath" | "json-path" | "json_path" => Ok(PathFormat::JsonPath),
            "jq" => Ok(PathFormat::Jq),
            "dot" | "dot-notation" | "dot_notation" => Ok(PathFormat::DotNotation),
            _ => Err(Error::UnsupportedFormat { name: s.to_string() }),
        }
    }
}
