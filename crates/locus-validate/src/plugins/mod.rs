//! Built-in validator plugins
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

pub mod platform;
pub mod schema;

pub use platform::PlatformSupportPlugin;
pub use schema::JsonSchemaPlugin;
