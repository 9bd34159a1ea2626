//! Built-in document scans that run after the validator plugins
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

pub mod bindings;
pub mod components;

pub use bindings::{classify_binding, scan_data_bindings, BindingKind, DataBinding, DataBindingStats};
pub use components::{scan_components, ComponentVersionStats};
