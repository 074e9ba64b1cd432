//! Per-pass memo table for top-level could-be results

use crate::target::TargetKey;
use crate::types::TypeHandle;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Hit/miss counters of a [`MatchCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Results keyed by `(type, target)`
///
/// Only whole-traversal answers are stored, so a cached value is exactly what
/// a fresh walk from the same root would return.
#[derive(Debug, Default)]
pub struct MatchCache {
    results: RefCell<HashMap<(TypeHandle, TargetKey), bool>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached answer, computing and storing it on a miss
    pub fn get_or_compute(
        &self,
        handle: TypeHandle,
        key: TargetKey,
        compute: impl FnOnce() -> bool,
    ) -> bool {
        let entry = (handle, key);
        if let Some(result) = self.results.borrow().get(&entry) {
            self.hits.set(self.hits.get() + 1);
            return *result;
        }

        self.misses.set(self.misses.get() + 1);
        let result = compute();
        self.results.borrow_mut().insert(entry, result);
        result
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entries: self.results.borrow().len(),
        }
    }
}
