//! Response cache.
//!
//! Entries are keyed by the canonical URL (`Url::cache_key`) and live for
//! `max-age - age` seconds from the moment they are written. Stores enforce
//! expiry themselves: an expired entry is reported as a miss and dropped.
//! Backends:
//! - [`MemoryCache`]: process-local map.
//! - [`DiskCache`]: one JSON file per entry, survives restarts.
//! - [`NoCache`]: caching disabled.

mod clock;
mod disk;
mod memory;
mod policy;

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use crate::error::CacheError;
use crate::headers::ResponseHeaders;

pub use clock::{Clock, SystemClock};
pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use policy::{ttl_from_headers, MAX_TTL_SECS};

/// A stored response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub headers: ResponseHeaders,
    pub body: String,
    pub stored_at: SystemTime,
    /// Lifetime granted at write time.
    pub ttl_secs: u64,
}

impl CacheEntry {
    /// `None` when the expiry lies past what `SystemTime` can represent;
    /// such an entry never expires.
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.stored_at
            .checked_add(Duration::from_secs(self.ttl_secs))
    }

    pub fn is_fresh_at(&self, now: SystemTime) -> bool {
        self.expires_at().map_or(true, |expiry| now < expiry)
    }

    /// Lifetime left at `now`; zero once expired, `Duration::MAX` if the
    /// entry never expires.
    pub fn remaining_at(&self, now: SystemTime) -> Duration {
        match self.expires_at() {
            Some(expiry) => expiry.duration_since(now).unwrap_or(Duration::ZERO),
            None => Duration::MAX,
        }
    }
}

/// Shared, thread-safe key-value store for responses.
pub trait CacheStore: Send + Sync {
    /// Fresh entry for `key`, or `None` on miss or expiry.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Store a response for `ttl`. A zero `ttl` stores nothing.
    fn put(
        &self,
        key: &str,
        headers: &ResponseHeaders,
        body: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Remove every entry. Returns how many were removed.
    fn purge(&self) -> Result<usize, CacheError>;
}

/// Store used when caching is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _key: &str) -> Option<CacheEntry> {
        None
    }

    fn put(
        &self,
        _key: &str,
        _headers: &ResponseHeaders,
        _body: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    fn purge(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}
