//! Persistent cache: one JSON document per entry.
//!
//! Files live under `$XDG_CACHE_HOME/brw/http/` (or a configured directory)
//! and are named by the SHA-256 of the cache key, so arbitrary URLs map to
//! safe file names. Expired or unreadable files are removed on lookup.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{CacheEntry, CacheStore, Clock, SystemClock};
use crate::error::CacheError;
use crate::headers::ResponseHeaders;

const ENTRY_EXT: &str = "json";

pub struct DiskCache {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    // Serializes read-modify-write of entry files within this process.
    io_lock: Mutex<()>,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::open_with_clock(dir, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            clock,
            io_lock: Mutex::new(()),
        })
    }

    /// Open the cache under the XDG cache directory.
    pub fn open_default() -> Result<Self, CacheError> {
        Self::open(default_cache_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir
            .join(format!("{}.{}", hex::encode(digest), ENTRY_EXT))
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.io_lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
        let data = match fs::read(path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// `$XDG_CACHE_HOME/brw/http`, created if missing.
pub fn default_cache_dir() -> Result<PathBuf, CacheError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("brw")?;
    xdg_dirs
        .create_cache_directory("http")
        .map_err(|source| CacheError::Io {
            path: xdg_dirs.get_cache_file("http"),
            source,
        })
}

impl CacheStore for DiskCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let _guard = self.guard();

        let entry = match Self::read_entry(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("dropping unreadable cache entry: {e}");
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if entry.key != key {
            return None;
        }
        if !entry.is_fresh_at(self.clock.now()) {
            tracing::debug!("cache entry for {key} expired");
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(entry)
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
        let path = self.entry_path(key);
        let data = serde_json::to_vec(&entry).map_err(|source| CacheError::Corrupt {
            path: path.clone(),
            source,
        })?;

        // Write then rename so readers never see a half-written entry.
        let tmp = path.with_extension("tmp");
        let _guard = self.guard();
        fs::write(&tmp, data)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })
    }

    fn purge(&self) -> Result<usize, CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.dir.clone(),
            source,
        };
        let _guard = self.guard();
        let mut removed = 0;
        for dirent in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = dirent.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXT) {
                fs::remove_file(&path).map_err(io_err)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_clock::ManualClock;
    use tempfile::tempdir;

    fn headers() -> ResponseHeaders {
        [("Content-Type", "text/html"), ("Cache-Control", "max-age=60")]
            .into_iter()
            .collect()
    }

    #[test]
    fn put_then_get_survives_reopen() {
        let dir = tempdir().unwrap();
        let key = "http://example.org/index.html";
        {
            let cache = DiskCache::open(dir.path()).unwrap();
            cache
                .put(key, &headers(), "<p>cached</p>", Duration::from_secs(60))
                .unwrap();
        }
        let cache = DiskCache::open(dir.path()).unwrap();
        let entry = cache.get(key).unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.body, "<p>cached</p>");
        assert_eq!(entry.headers.get("content-type"), Some("text/html"));
        assert_eq!(entry.ttl_secs, 60);
    }

    #[test]
    fn expired_entry_is_a_miss_and_removed() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::new());
        let cache = DiskCache::open_with_clock(dir.path(), clock.clone()).unwrap();
        cache
            .put("k", &headers(), "b", Duration::from_secs(60))
            .unwrap();
        let path = cache.entry_path("k");
        assert!(path.exists());

        clock.advance(Duration::from_secs(61));
        assert!(cache.get("k").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn oversized_ttl_survives_reload() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();
        cache
            .put("k", &headers(), "b", Duration::from_secs(u64::MAX))
            .unwrap();
        let entry = cache.get("k").unwrap();
        assert_eq!(entry.ttl_secs, u64::MAX);
        assert!(entry.expires_at().is_none());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();
        fs::write(cache.entry_path("k"), b"{not json").unwrap();
        assert!(cache.get("k").is_none());
        assert!(!cache.entry_path("k").exists());
    }

    #[test]
    fn default_dir_follows_xdg_cache_home() {
        let home = tempdir().unwrap();
        std::env::set_var("XDG_CACHE_HOME", home.path());
        let cache = DiskCache::open_default().unwrap();
        assert_eq!(cache.dir(), home.path().join("brw").join("http"));
        assert!(cache.dir().is_dir());
    }

    #[test]
    fn purge_removes_all_entries() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();
        for key in ["a", "b", "c"] {
            cache
                .put(key, &headers(), key, Duration::from_secs(60))
                .unwrap();
        }
        fs::write(dir.path().join("unrelated.txt"), b"keep").unwrap();
        assert_eq!(cache.purge().unwrap(), 3);
        assert!(cache.get("a").is_none());
        assert!(dir.path().join("unrelated.txt").exists());
    }
}
