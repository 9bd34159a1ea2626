//! Content-addressed cache of position maps
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::builder::PositionMapBuilder;
use super::map::PositionMap;
use crate::path::{CacheConfig, CacheStats};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Hex-encoded SHA-256 of a source text
pub fn content_digest(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

#[derive(Debug)]
struct CachedMap {
    map: Arc<PositionMap>,
    modified: Option<SystemTime>,
}

impl CachedMap {
    /// A cached map is stale once the file on disk is newer than what was indexed
    fn is_valid(&self, modified: Option<SystemTime>) -> bool {
        match (self.modified, modified) {
            (Some(cached), Some(current)) => current <= cached,
            _ => true,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CachedMap>,
    /// Least recently used first
    access_order: Vec<String>,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            let key = self.access_order.remove(pos);
            self.access_order.push(key);
        }
    }

    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let key = self.access_order.remove(0);
        self.entries.remove(&key);
        log::debug!("evicted position map {}", &key[..key.len().min(12)]);
    }
}

/// LRU cache of built position maps keyed by content digest.
///
/// Identical text always maps to the same [`PositionMap`], so repeated
/// validations of an unchanged file skip the scan.
#[derive(Debug)]
pub struct PositionMapCache {
    state: Mutex<CacheState>,
    config: CacheConfig,
    builder: PositionMapBuilder,
}

impl Default for PositionMapCache {
    fn default() -> Self {
        Self::new(CacheConfig {
            max_entries: 64,
            enabled: true,
        })
    }
}

impl PositionMapCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_builder(config, PositionMapBuilder::default())
    }

    pub fn with_builder(config: CacheConfig, builder: PositionMapBuilder) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            config,
            builder,
        }
    }

    /// Return the cached map for `source`, building it on a miss
    pub fn get_or_build(&self, source: &str, modified: Option<SystemTime>) -> Arc<PositionMap> {
        if !self.config.enabled || self.config.max_entries == 0 {
            return Arc::new(self.builder.build(source));
        }

        let key = content_digest(source);
        {
            let mut state = self.state.lock();
            let cached = state
                .entries
                .get(&key)
                .filter(|entry| entry.is_valid(modified))
                .map(|entry| Arc::clone(&entry.map));
            if let Some(map) = cached {
                state.hits += 1;
                state.touch(&key);
                return map;
            }
            state.misses += 1;
        }

        // build outside the lock; a racing build of the same text yields an equal map
        let map = Arc::new(self.builder.build(source));

        let mut state = self.state.lock();
        if state.entries.remove(&key).is_some() {
            state.access_order.retain(|k| k != &key);
        }
        while state.entries.len() >= self.config.max_entries {
            state.evict_lru();
        }
        state.entries.insert(
            key.clone(),
            CachedMap {
                map: Arc::clone(&map),
                modified,
            },
        );
        state.access_order.push(key);
        map
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.access_order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            max_entries: self.config.max_entries,
            hits: state.hits,
            misses: state.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_same_text_is_shared() {
        let cache = PositionMapCache::default();
        let first = cache.get_or_build(r#"{"a": 1}"#, None);
        let second = cache.get_or_build(r#"{"a": 1}"#, None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_newer_mtime_rebuilds() {
        let cache = PositionMapCache::default();
        let then = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let later = then + Duration::from_secs(1);
        let first = cache.get_or_build("[1]", Some(then));
        let second = cache.get_or_build("[1]", Some(later));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = PositionMapCache::new(CacheConfig {
            max_entries: 2,
            enabled: true,
        });
        cache.get_or_build("[1]", None);
        cache.get_or_build("[2]", None);
        cache.get_or_build("[1]", None);
        cache.get_or_build("[3]", None);
        assert_eq!(cache.len(), 2);
        // "[2]" was least recently used
        cache.get_or_build("[2]", None);
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(content_digest("abc"), content_digest("abc"));
        assert_ne!(content_digest("abc"), content_digest("abd"));
        assert_eq!(content_digest("").len(), 64);
    }
}
