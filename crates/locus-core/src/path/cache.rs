//! Shared conversion cache
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::format::PathFormat;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Configuration for cache behavior
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum cache size (number of entries)
    pub max_entries: usize,
    /// Whether to enable cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    source_format: Option<PathFormat>,
    target_format: PathFormat,
}

/// A successful conversion remembered by the cache
#[derive(Debug, Clone)]
pub struct CachedConversion {
    pub result: String,
    pub source_format: PathFormat,
}

/// Write-once conversion cache, safe to share between threads.
///
/// Entries are never replaced once inserted, so concurrent readers always
/// observe the same value for a key. When the cache is full new keys are
/// simply not admitted.
#[derive(Debug, Default)]
pub struct ConversionCache {
    entries: RwLock<HashMap<CacheKey, CachedConversion>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ConversionCache {
    /// Create a new cache with default configuration
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(
        &self,
        source: &str,
        source_format: Option<PathFormat>,
        target_format: PathFormat,
    ) -> Option<CachedConversion> {
        if !self.config.enabled {
            return None;
        }
        let key = CacheKey {
            source: source.to_string(),
            source_format,
            target_format,
        };
        let found = self.entries.read().get(&key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub(crate) fn insert(
        &self,
        source: &str,
        source_format: Option<PathFormat>,
        target_format: PathFormat,
        value: CachedConversion,
    ) {
        if !self.config.enabled {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= self.config.max_entries {
            log::debug!("conversion cache full ({} entries), not admitting '{}'", entries.len(), source);
            return;
        }
        entries
            .entry(CacheKey {
                source: source.to_string(),
                source_format,
                target_format,
            })
            .or_insert(value);
    }

    /// Number of cached conversions
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            max_entries: self.config.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that were served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
