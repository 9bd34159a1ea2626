//! Source positions for structural paths
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license
//!
//! A [`PositionMap`] answers "where in the text is this path?" for every key
//! and array element of a JSON document. Lookups never fail: a path that was
//! not recorded resolves to its nearest recorded ancestor, and a path with no
//! relation to the document resolves to line 1.
//!
//! # Example
//!
//! ```
//! use locus_core::position::{MatchConfidence, PositionMap};
//!
//! let map = PositionMap::build("{\n  \"a\": {\"b\": [1, 2, 3]}\n}");
//! let hit = map.find_by_path("a.b[1]");
//! assert_eq!(hit.confidence, MatchConfidence::Exact);
//! assert_eq!(hit.line(), 2);
//! ```

pub mod builder;
pub mod cache;
pub mod map;

pub use builder::{BuilderOptions, PositionMapBuilder};
pub use cache::{content_digest, PositionMapCache};
pub use map::{MatchConfidence, PositionEntry, PositionInfo, PositionMap, PositionMatch};
