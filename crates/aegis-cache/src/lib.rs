//! Content-addressed cache over upstream API responses.
//!
//! Entries live at `<root>/<category>/<16-hex-key>.json`. A corrupted file
//! is treated as an absent entry: it is deleted and the caller sees a
//! miss. Writes are atomic (temp file + rename, see [`aegis_fsutil`]).

mod entry;
mod key;
mod ttl;

pub use entry::CacheEntry;
pub use key::cache_key;

use std::collections::HashMap;
use std::path::PathBuf;

use aegis_config::CacheTtlConfig;
use chrono::Utc;

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub live: usize,
    pub expired: usize,
    pub by_category: HashMap<String, usize>,
}

pub struct Cache {
    root: PathBuf,
    ttl_config: CacheTtlConfig,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>, ttl_config: CacheTtlConfig) -> Self {
        Self {
            root: root.into(),
            ttl_config,
        }
    }

    fn entry_path(&self, category: &str, key: &str) -> PathBuf {
        self.root.join(category).join(format!("{key}.json"))
    }

    fn read_entry(&self, path: &PathBuf) -> Option<CacheEntry> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry, deleting");
                let _ = std::fs::remove_file(path);
                None
            }
        }
    }

    /// Returns the entry only if it has not expired. Expired entries are
    /// deleted lazily on read.
    pub fn get(&self, category: &str, endpoint: &str, body: Option<&str>) -> Option<serde_json::Value> {
        let key = cache_key(endpoint, body);
        let path = self.entry_path(category, &key);
        let entry = self.read_entry(&path)?;
        if entry.is_expired_at(Utc::now()) {
            let _ = std::fs::remove_file(&path);
            return None;
        }
        Some(entry.data)
    }

    /// Returns the entry regardless of expiration, for cache-only degraded
    /// mode.
    pub fn get_stale(&self, category: &str, endpoint: &str, body: Option<&str>) -> Option<serde_json::Value> {
        let key = cache_key(endpoint, body);
        let path = self.entry_path(category, &key);
        self.read_entry(&path).map(|e| e.data)
    }

    pub fn set(&self, category: &str, endpoint: &str, data: serde_json::Value, body: Option<&str>) -> std::io::Result<()> {
        let key = cache_key(endpoint, body);
        let path = self.entry_path(category, &key);
        let ttl_secs = ttl::ttl_for(&self.ttl_config, category);
        let entry = CacheEntry::new(category, endpoint, data, ttl_secs);
        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        aegis_fsutil::atomic_write(&path, &bytes)
    }

    /// Scans every category directory, deleting expired entries. Returns
    /// `(purged, remaining)`.
    pub fn purge_expired(&self) -> (usize, usize) {
        let mut purged = 0;
        let mut remaining = 0;
        let now = Utc::now();

        let Ok(categories) = std::fs::read_dir(&self.root) else {
            return (0, 0);
        };

        for category_dir in categories.flatten() {
            let Ok(files) = std::fs::read_dir(category_dir.path()) else {
                continue;
            };
            for file in files.flatten() {
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                match self.read_entry(&path) {
                    Some(entry) if entry.is_expired_at(now) => {
                        let _ = std::fs::remove_file(&path);
                        purged += 1;
                    }
                    Some(_) => remaining += 1,
                    None => purged += 1, // corrupt entries were already removed
                }
            }
        }

        (purged, remaining)
    }

    /// Non-mutating snapshot of cache occupancy.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        let now = Utc::now();

        let Ok(categories) = std::fs::read_dir(&self.root) else {
            return stats;
        };

        for category_dir in categories.flatten() {
            let category_name = category_dir.file_name().to_string_lossy().to_string();
            let Ok(files) = std::fs::read_dir(category_dir.path()) else {
                continue;
            };
            let mut count = 0;
            for file in files.flatten() {
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let Some(content) = std::fs::read_to_string(&path).ok() else {
                    continue;
                };
                let Ok(entry) = serde_json::from_str::<CacheEntry>(&content) else {
                    continue;
                };
                count += 1;
                stats.total += 1;
                if entry.is_expired_at(now) {
                    stats.expired += 1;
                } else {
                    stats.live += 1;
                }
            }
            if count > 0 {
                stats.by_category.insert(category_name, count);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_ttl(dir: &std::path::Path, category: &str, ttl_secs: u64) -> Cache {
        let mut ttl_config = CacheTtlConfig::default();
        ttl_config.ttl_seconds.insert(category.to_string(), ttl_secs);
        Cache::new(dir, ttl_config)
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with_ttl(dir.path(), "ioc", 3600);
        cache.set("ioc", "/lookup", serde_json::json!({"v": 1}), None).unwrap();
        let got = cache.get("ioc", "/lookup", None).unwrap();
        assert_eq!(got, serde_json::json!({"v": 1}));
    }

    #[test]
    fn expired_entry_is_a_miss_but_stale_read_still_works() {
        let dir = tempfile::tempdir().unwrap();
        // 0-second TTL: the entry is already expired the instant it's written.
        let cache = cache_with_ttl(dir.path(), "ioc", 0);
        cache.set("ioc", "/lookup", serde_json::json!({"v": 1}), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(cache.get("ioc", "/lookup", None).is_none());
        assert_eq!(cache.get_stale("ioc", "/lookup", None).unwrap(), serde_json::json!({"v": 1}));
    }

    #[test]
    fn corrupt_file_is_treated_as_miss_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with_ttl(dir.path(), "ioc", 3600);
        let key = cache_key("/lookup", None);
        let path = dir.path().join("ioc").join(format!("{key}.json"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        assert!(cache.get("ioc", "/lookup", None).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn purge_expired_removes_only_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut ttl_config = CacheTtlConfig::default();
        ttl_config.ttl_seconds.insert("ioc".to_string(), 0);
        ttl_config.ttl_seconds.insert("profile".to_string(), 3600);
        let cache = Cache::new(dir.path(), ttl_config);

        cache.set("ioc", "/a", serde_json::json!(1), None).unwrap();
        cache.set("profile", "/b", serde_json::json!(2), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let (purged, remaining) = cache.purge_expired();
        assert_eq!(purged, 1);
        assert_eq!(remaining, 1);
    }

    #[test]
    fn stats_reports_live_and_expired_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut ttl_config = CacheTtlConfig::default();
        ttl_config.ttl_seconds.insert("ioc".to_string(), 0);
        ttl_config.ttl_seconds.insert("profile".to_string(), 3600);
        let cache = Cache::new(dir.path(), ttl_config);

        cache.set("ioc", "/a", serde_json::json!(1), None).unwrap();
        cache.set("profile", "/b", serde_json::json!(2), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let stats = cache.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.live, 1);
        assert_eq!(stats.by_category.get("ioc"), Some(&1));
    }

    #[test]
    fn double_set_is_idempotent_for_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with_ttl(dir.path(), "ioc", 3600);
        cache.set("ioc", "/a", serde_json::json!({"v": 1}), None).unwrap();
        cache.set("ioc", "/a", serde_json::json!({"v": 1}), None).unwrap();
        assert_eq!(cache.get("ioc", "/a", None).unwrap(), serde_json::json!({"v": 1}));
    }
}
