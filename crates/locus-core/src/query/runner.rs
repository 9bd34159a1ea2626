//! Cache, native engine, fallback: in that order
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::fallback::FallbackEvaluator;
use super::{QueryEngine, QueryMethod, QueryResult};
use crate::path::{CacheConfig, PathConverter, PathFormat};
use crate::position::content_digest;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Runs path queries against JSON values. Never fails: problems are
/// reported through [`QueryResult::error`].
pub struct QueryRunner {
    engine: Option<Box<dyn QueryEngine>>,
    fallback: FallbackEvaluator,
    converter: PathConverter,
    cache: RwLock<HashMap<(String, String), Vec<Value>>>,
    config: CacheConfig,
}

impl Default for QueryRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRunner {
    /// Runner with no native engine
    pub fn new() -> Self {
        Self {
            engine: None,
            fallback: FallbackEvaluator::new(),
            converter: PathConverter::new(),
            cache: RwLock::new(HashMap::new()),
            config: CacheConfig {
                max_entries: 1_000,
                enabled: true,
            },
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn QueryEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_deref().map(|engine| engine.name())
    }

    pub fn query(&self, data: &Value, expression: &str) -> QueryResult {
        let started = Instant::now();
        let key = self.cache_key(data, expression);

        if let Some(values) = key.as_ref().and_then(|k| self.cache.read().get(k).cloned()) {
            return QueryResult::ok(values, QueryMethod::Cache, started.elapsed());
        }

        let mut native_error = None;
        if let Some(engine) = self.engine.as_deref().filter(|engine| engine.is_available()) {
            if let Some(native) = self.native_expression(expression) {
                match engine.query(data, &native) {
                    Ok(values) => {
                        self.remember(key, &values);
                        return QueryResult::ok(values, QueryMethod::Native, started.elapsed());
                    }
                    Err(e) => {
                        log::debug!("{} failed for '{}', using fallback: {:#}", engine.name(), native, e);
                        native_error = Some(format!("{:#}", e));
                    }
                }
            }
        }

        match self.fallback.evaluate(data, expression) {
            Ok(values) => {
                self.remember(key, &values);
                QueryResult::ok(values, QueryMethod::Fallback, started.elapsed())
            }
            Err(e) => {
                let message = match native_error {
                    Some(native) => format!("{}; native engine: {}", e, native),
                    None => e.to_string(),
                };
                QueryResult {
                    data: Vec::new(),
                    method: QueryMethod::Fallback,
                    execution_time: started.elapsed(),
                    error: Some(message),
                }
            }
        }
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Expressions the fallback understands are translated to jq syntax;
    /// wildcard forms are left to the fallback.
    fn native_expression(&self, expression: &str) -> Option<String> {
        match PathFormat::detect(expression) {
            PathFormat::Jq => Some(expression.to_string()),
            format => self
                .converter
                .parse_strict(expression, format)
                .ok()
                .map(|segments| self.converter.render(&segments, PathFormat::Jq)),
        }
    }

    fn cache_key(&self, data: &Value, expression: &str) -> Option<(String, String)> {
        if !self.config.enabled {
            return None;
        }
        let serialized = serde_json::to_string(data).ok()?;
        Some((content_digest(&serialized), expression.to_string()))
    }

    fn remember(&self, key: Option<(String, String)>, values: &[Value]) {
        let Some(key) = key else {
            return;
        };
        let mut cache = self.cache.write();
        if cache.len() < self.config.max_entries {
            cache.entry(key).or_insert_with(|| values.to_vec());
        }
    }
}
