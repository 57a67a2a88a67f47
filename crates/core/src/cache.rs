//! Generic key-value cache used by the translation collaborator.
//!
//! The backing store is pluggable so a deployment can substitute a
//! persistent or shared cache without changing the translation contract.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Minimal string cache: `get` and `set`, nothing else.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// In-process cache backed by a mutex-guarded map. The default backing
/// store for a single-node deployment.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        // A poisoned lock only means a writer panicked mid-insert; the map
        // itself is still a usable cache.
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
    }
}
