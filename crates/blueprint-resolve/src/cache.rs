//! Key-value caches with per-entry time-to-live

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::clock::{Clock, SystemClock};

/// A key-value store whose entries expire.
///
/// Implementations are best-effort: a cache that cannot persist a write logs
/// the failure and carries on, because a lost entry only costs one extra
/// catalog query.
pub trait TtlCache {
    /// The live value for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` for `ttl_secs` seconds.
    fn set(&mut self, key: &str, value: Value, ttl_secs: u64);

    /// Remove `key`.
    fn delete(&mut self, key: &str);
}

/// A cached value and the moment it stops being served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still served at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

fn expiry(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// In-process cache
#[derive(Debug, Clone, Default)]
pub struct MemoryCache<C: Clock = SystemClock> {
    entries: HashMap<String, CacheEntry>,
    clock: C,
}

impl MemoryCache<SystemClock> {
    /// Create an empty cache on wall-clock time.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> MemoryCache<C> {
    /// Create an empty cache that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entry for `key`, regardless of expiry.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before - self.entries.len()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<C: Clock> TtlCache for MemoryCache<C> {
    fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: Value, ttl_secs: u64) {
        let expires_at = expiry(self.clock.now(), ttl_secs);
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// A cache persisted as one JSON document.
///
/// The whole document is rewritten atomically on every change. Expired
/// entries are dropped when the file is opened; an unreadable document is
/// treated as an empty cache.
#[derive(Debug)]
pub struct FileCache<C: Clock = SystemClock> {
    path: PathBuf,
    inner: MemoryCache<C>,
}

impl FileCache<SystemClock> {
    /// Open (or start) the cache document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_clock(path, SystemClock)
    }
}

impl<C: Clock> FileCache<C> {
    /// Open the cache document at `path`, reading time from `clock`.
    pub fn open_with_clock(path: impl Into<PathBuf>, clock: C) -> Result<Self> {
        let path = path.into();
        let mut inner = MemoryCache::with_clock(clock);

        if let Some(content) = blueprint_fs::read_locked(&path)? {
            if !content.trim().is_empty() {
                match serde_json::from_str(&content) {
                    Ok(entries) => inner.entries = entries,
                    // The next write replaces the unreadable document
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring unreadable cache document"
                    ),
                }
            }
        }

        let purged = inner.purge_expired();
        if purged > 0 {
            tracing::debug!(path = %path.display(), purged, "dropped expired cache entries");
        }

        Ok(Self { path, inner })
    }

    /// Location of the cache document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every entry and persist the empty document.
    pub fn clear(&mut self) -> Result<()> {
        self.inner.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.inner.entries)?;
        blueprint_fs::write_text(&self.path, &content)?;
        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist cache");
        }
    }
}

impl<C: Clock> TtlCache for FileCache<C> {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Value, ttl_secs: u64) {
        self.inner.set(key, value, ttl_secs);
        self.save_or_warn();
    }

    fn delete(&mut self, key: &str) {
        self.inner.delete(key);
        self.save_or_warn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_returns_value() {
        let mut cache = MemoryCache::new();
        cache.set("ns:akismet", json!({"kind": "unavailable"}), 60);
        assert_eq!(cache.get("ns:akismet"), Some(json!({"kind": "unavailable"})));
    }

    #[test]
    fn zero_ttl_is_never_served() {
        let mut cache = MemoryCache::new();
        cache.set("ns:akismet", json!(true), 0);
        assert_eq!(cache.get("ns:akismet"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn delete_removes_entry() {
        let mut cache = MemoryCache::new();
        cache.set("ns:a", json!(1), 60);
        cache.delete("ns:a");
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_document_opens_as_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let mut cache = FileCache::open(&path).unwrap();
        assert!(cache.is_empty());

        cache.set("ns:akismet", json!(true), 60);
        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("ns:akismet"), Some(json!(true)));
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let mut cache = MemoryCache::new();
        cache.set("ns:forever", json!(1), u64::MAX);
        assert_eq!(cache.get("ns:forever"), Some(json!(1)));
        assert_eq!(
            cache.entry("ns:forever").unwrap().expires_at,
            DateTime::<Utc>::MAX_UTC
        );
    }
}
