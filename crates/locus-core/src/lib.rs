//! Locus Core - source positions for structural JSON paths
//!
//! This crate maps structural locations inside a JSON document back to the
//! line and column where they appear in the original text, so that errors
//! raised against parsed values can be reported where a human can find them.
//!
//! # Main Components
//!
//! - **Path Segment Algebra**: the shared key/index segment model
//! - **Path Converter**: JSON Pointer, Property Path, JSONPath, jq and dot notation
//! - **Position Map**: single-pass builder and a lookup surface with ancestor fallback
//! - **Error Field Detector**: priority-ordered rules from messages to fields
//! - **Query**: result contract, native engine trait and an in-process fallback
//!
//! # Example
//!
//! ```
//! use locus_core::{ErrorFieldDetector, PathConverter, PositionMap};
//!
//! let source = "{\n  \"items\": [\n    {\"name\": 1}\n  ]\n}";
//! let map = PositionMap::build(source);
//!
//! let pointer = PathConverter::new().to_pointer("items[0].name").unwrap();
//! assert_eq!(pointer, "/items/0/name");
//! assert_eq!(map.get_line_number(&pointer), 3);
//!
//! let info = ErrorFieldDetector::new().detect("1 is not of type \"string\"", &pointer);
//! assert_eq!(info.field.as_deref(), Some("name"));
//! ```
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

pub mod detector;
pub mod error;
pub mod path;
pub mod position;
pub mod query;

// Re-export main types for convenience
pub use detector::{Confidence, DetectionRule, DetectorCache, ErrorFieldDetector, ErrorFieldInfo, Extractor};
pub use error::{Error, Result};
pub use path::{
    CacheConfig, CacheStats, ConversionCache, ConversionResult, PathConverter, PathFormat, PathSegment,
    SegmentKind,
};
pub use position::{
    BuilderOptions, MatchConfidence, PositionEntry, PositionInfo, PositionMap, PositionMapBuilder,
    PositionMapCache, PositionMatch,
};
pub use query::{FallbackEvaluator, JqCommand, QueryEngine, QueryMethod, QueryResult, QueryRunner};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
