//! In-process cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{CacheEntry, CacheStore, Clock, SystemClock};
use crate::error::CacheError;
use crate::headers::ResponseHeaders;

/// Map behind a mutex; expired entries are removed when looked up or by
/// [`MemoryCache::purge_expired`].
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh_at(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned map is still structurally valid; keep serving it.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if entry.is_fresh_at(now) {
            return Some(entry.clone());
        }
        entries.remove(key);
        tracing::debug!("cache entry for {key} expired");
        None
    }

    fn put(
        &self,
        key: &str,
        headers: &ResponseHeaders,
        body: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.as_secs() == 0 {
            return Ok(());
        }
        let entry = CacheEntry {
            key: key.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
            stored_at: self.clock.now(),
            ttl_secs: ttl.as_secs(),
        };
        self.lock().insert(key.to_string(), entry);
        Ok(())
    }

    fn purge(&self) -> Result<usize, CacheError> {
        let mut entries = self.lock();
        let n = entries.len();
        entries.clear();
        Ok(n)
    }
}
