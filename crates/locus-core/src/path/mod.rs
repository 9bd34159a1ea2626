//! Path segment algebra and conversion between path notations
//!
//! Five notations are supported: JSON Pointer (`/a/0/b`), Property Path
//! (`a[0].b`), JSONPath (`$.a[0].b`), jq (`.a[0].b`) and dot notation
//! (`a.0.b`). All of them parse into and render from [`PathSegment`] lists.
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod converter;
pub mod format;
pub mod parser;
pub mod segment;

pub use cache::{CacheConfig, CacheStats, ConversionCache};
pub use converter::{ConversionResult, PathConverter};
pub use format::PathFormat;
pub use parser::Parser;
pub use segment::{
    escape_pointer_token, segments_to_pointer, segments_to_property_path,
    unescape_pointer_token, PathSegment, SegmentKind,
};
