//! Query results and engines
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license
//!
//! A [`QueryRunner`] answers path queries against parsed JSON. It consults
//! its result cache, then a native [`QueryEngine`] when one is installed and
//! available, then the in-process [`FallbackEvaluator`].

pub mod fallback;
pub mod jq;
pub mod runner;

pub use fallback::FallbackEvaluator;
pub use jq::JqCommand;
pub use runner::QueryRunner;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Which path produced a query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMethod {
    Native,
    Fallback,
    Cache,
}

/// Outcome of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Vec<Value>,
    pub method: QueryMethod,
    pub execution_time: Duration,
    pub error: Option<String>,
}

impl QueryResult {
    pub(crate) fn ok(data: Vec<Value>, method: QueryMethod, execution_time: Duration) -> Self {
        Self {
            data,
            method,
            execution_time,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// An external query engine
pub trait QueryEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the engine can be used in this environment
    fn is_available(&self) -> bool;

    fn query(&self, data: &Value, expression: &str) -> anyhow::Result<Vec<Value>>;
}
