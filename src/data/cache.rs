//! Local HTTP response caching
//!
//! Caches raw provider responses on disk, keyed by request parameters, so
//! repeated runs within the freshness window do not hit the network.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::{ScreenerError, ScreenerResult};

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Maximum age before refresh (in days)
    pub max_age_days: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache"),
            max_age_days: 1,
            enabled: true,
        }
    }
}

/// One cached response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

impl CacheEntry {
    /// Entry is younger than `max_age_days` at `now`
    pub fn is_fresh_at(&self, now: DateTime<Utc>, max_age_days: i64) -> bool {
        now - self.fetched_at < Duration::days(max_age_days)
    }
}

/// Data cache manager
pub struct DataCache {
    config: CacheConfig,
}

impl DataCache {
    pub fn new(config: CacheConfig) -> ScreenerResult<Self> {
        if config.enabled && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }

        Ok(Self { config })
    }

    /// File path for a cache key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn read_entry(&self, key: &str) -> ScreenerResult<Option<CacheEntry>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        match serde_json::from_str(&json) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // Unreadable entries are refetched
                tracing::warn!("Ignoring corrupt cache entry {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    /// Check if cache is valid (exists and not expired)
    pub fn is_valid(&self, key: &str) -> bool {
        matches!(self.load_at(key, Utc::now()), Ok(Some(_)))
    }

    /// Load a fresh entry
    pub fn load(&self, key: &str) -> ScreenerResult<Option<CacheEntry>> {
        self.load_at(key, Utc::now())
    }

    /// Load an entry if it is still fresh at `now`
    pub fn load_at(&self, key: &str, now: DateTime<Utc>) -> ScreenerResult<Option<CacheEntry>> {
        if !self.config.enabled {
            return Ok(None);
        }

        Ok(self
            .read_entry(key)?
            .filter(|entry| entry.is_fresh_at(now, self.config.max_age_days)))
    }

    /// Save a response body under `key`
    pub fn store(&self, key: &str, url: &str, body: &str) -> ScreenerResult<()> {
        self.store_entry(&CacheEntry {
            key: key.to_string(),
            url: url.to_string(),
            fetched_at: Utc::now(),
            body: body.to_string(),
        })
    }

    pub fn store_entry(&self, entry: &CacheEntry) -> ScreenerResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.entry_path(&entry.key);
        let json = serde_json::to_string(entry)?;
        fs::write(&path, json)?;

        tracing::debug!("Cached {} at {:?}", entry.key, path);
        Ok(())
    }

    /// Remove the entry `prefix` and every entry keyed `{prefix}_*`
    pub fn clear(&self, prefix: &str) -> ScreenerResult<()> {
        if !self.config.cache_dir.exists() {
            return Ok(());
        }

        let prefix = sanitize_key(prefix);
        let scoped = format!("{}_", prefix);
        for entry in fs::read_dir(&self.config.cache_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            if let Some(key) = file_name.strip_suffix(".json") {
                if key == prefix || key.starts_with(&scoped) {
                    fs::remove_file(entry.path())?;
                }
            }
        }

        Ok(())
    }

    /// Clear all cache
    pub fn clear_all(&self) -> ScreenerResult<()> {
        if self.config.cache_dir.exists() {
            fs::remove_dir_all(&self.config.cache_dir)?;
            fs::create_dir_all(&self.config.cache_dir)?;
        }
        Ok(())
    }

    /// List cached keys, sorted
    pub fn list_keys(&self) -> ScreenerResult<Vec<String>> {
        let mut keys = Vec::new();

        if !self.config.cache_dir.exists() {
            return Ok(keys);
        }

        for entry in fs::read_dir(&self.config.cache_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            if let Some(key) = file_name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Keys become file names; anything outside `[A-Za-z0-9._-]` maps to `_`
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Blocking HTTP transport that answers from the cache when it can
pub struct CachedTransport {
    client: reqwest::blocking::Client,
    cache: DataCache,
}

impl CachedTransport {
    pub fn new(config: CacheConfig) -> ScreenerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ScreenerError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cache: DataCache::new(config)?,
        })
    }

    /// GET `url`, using the cached body stored under `key` when fresh
    pub fn get_text(&self, key: &str, url: &str) -> ScreenerResult<String> {
        if let Some(entry) = self.cache.load(key)? {
            tracing::debug!("Cache hit for {}", key);
            return Ok(entry.body);
        }

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScreenerError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScreenerError::network(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .map_err(|e| ScreenerError::network(e.to_string()))?;

        self.cache.store(key, url, &body)?;
        Ok(body)
    }
}
