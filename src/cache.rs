//! Explicit memoization for the pipeline's pure functions.
//!
//! Each [`Memo`] holds at most one value together with the fingerprint of the
//! input it was computed from. Asking for a different input recomputes and
//! replaces the entry; [`Memo::invalidate`] drops it outright.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Content fingerprint of a hashable value.
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Single-slot cache keyed by input fingerprint.
#[derive(Debug)]
pub struct Memo<V> {
    name: &'static str,
    entry: Option<(u64, V)>,
    misses: u64,
}

impl<V> Memo<V> {
    pub fn new(name: &'static str) -> Self {
        Memo {
            name,
            entry: None,
            misses: 0,
        }
    }

    /// Fingerprint of the cached input, if any.
    pub fn key(&self) -> Option<u64> {
        self.entry.as_ref().map(|(k, _)| *k)
    }

    /// Cached value regardless of key.
    pub fn peek(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    /// How many times the value had to be computed.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("{}: cache invalidated", self.name);
        }
    }

    /// Return the value cached for `key`, computing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: u64, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_insert_with(key, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    /// Errors are not cached and leave the previous entry in place.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: u64, compute: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let entry = match self.entry.take() {
            Some((k, v)) if k == key => {
                log::debug!("{}: cache hit", self.name);
                (k, v)
            }
            stale => {
                self.misses += 1;
                match compute() {
                    Ok(v) => (key, v),
                    Err(e) => {
                        self.entry = stale;
                        return Err(e);
                    }
                }
            }
        };
        Ok(&self.entry.insert(entry).1)
    }
}
