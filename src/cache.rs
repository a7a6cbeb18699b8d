//! Explicit memoization of analysis results.
//!
//! The analysis engine itself never caches. A [`ResultCache`] sits in front
//! of it (owned by [`GroceryTrends`](crate::GroceryTrends) or by any other
//! caller) and maps a key describing the input to a previously computed
//! result. Entries live until they are invalidated or the cache is cleared;
//! failures are never stored.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{DateWindow, Item, TimeEncoding};

/// Identity of one item report: which series, which window, which encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportKey {
    pub item: Item,
    pub window: DateWindow,
    pub encoding: TimeEncoding,
}

/// Hit/miss counters and current size of a [`ResultCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// An inspectable `key -> value` memo table.
#[derive(Debug)]
pub struct ResultCache<K, V> {
    entries: HashMap<K, V>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for ResultCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing and storing it with
    /// `compute` on a miss.
    ///
    /// If `compute` fails the error is returned and nothing is stored.
    pub fn get_or_try_insert_with<F>(&mut self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(?key, "result cache hit");
            return Ok(value.clone());
        }

        self.misses += 1;
        tracing::debug!(?key, "result cache miss");
        let value = compute()?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Look up a value without touching the hit/miss counters.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop one entry, returning it if present.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Drop every entry whose key matches `predicate`. Returns how many were removed.
    pub fn invalidate_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&K) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|k, _| !predicate(k));
        before - self.entries.len()
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
