use anyhow::Context;
use domain::models::{BusinessChallenge, StrategyBrief};
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// Entries expire after 7 days.
const CACHE_TTL_SECONDS: u64 = 604_800;

#[derive(Serialize, Deserialize, Default)]
struct CacheFile {
    entries: Vec<CacheEntry>,
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    brief: StrategyBrief,
    timestamp: u64,
}

/// On-disk cache of generated briefs keyed by the exact request.
pub struct BriefCache {
    cache_path: PathBuf,
}

impl BriefCache {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
        }
    }

    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut path = PathBuf::from(home);
        path.push(".local");
        path.push("share");
        path.push("ai_consultant");
        path.push("brief_cache.bin");
        path
    }

    pub fn path(&self) -> &PathBuf {
        &self.cache_path
    }

    /// Key over every field that shapes the answer, including the model.
    pub fn key_for(challenge: &BusinessChallenge, model: &str) -> String {
        let material = [
            challenge.engagement_type.slug(),
            challenge.industry.trim(),
            challenge.challenge.trim(),
            challenge.constraints_or_default(),
            model,
        ]
        .join("\u{1f}");
        format!("{:x}", md5::compute(material.as_bytes()))
    }

    pub fn load(&self, key: &str) -> Result<Option<StrategyBrief>> {
        self.load_at(key, now_secs())
    }

    pub fn store(&self, key: &str, brief: &StrategyBrief) -> Result<()> {
        self.store_at(key, brief, now_secs())
    }

    fn load_at(&self, key: &str, now: u64) -> Result<Option<StrategyBrief>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let mut cache = self.read_file()?;
        let before = cache.entries.len();
        cache
            .entries
            .retain(|entry| now.saturating_sub(entry.timestamp) < CACHE_TTL_SECONDS);
        if cache.entries.len() != before {
            self.write_file(&cache)?;
        }
        Ok(cache
            .entries
            .into_iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| entry.brief))
    }

    fn store_at(&self, key: &str, brief: &StrategyBrief, now: u64) -> Result<()> {
        let mut cache = if self.cache_path.exists() {
            self.read_file()?
        } else {
            CacheFile::default()
        };
        cache.entries.retain(|entry| entry.key != key);
        cache.entries.push(CacheEntry {
            key: key.to_string(),
            brief: brief.clone(),
            timestamp: now,
        });
        self.write_file(&cache)
    }

    pub fn clear(&self) -> Result<bool> {
        if self.cache_path.exists() {
            fs::remove_file(&self.cache_path)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_file(&self) -> Result<CacheFile> {
        let data = fs::read(&self.cache_path)
            .with_context(|| format!("Failed to read cache file at {:?}", self.cache_path))?;
        // A cache written by an older layout is discarded rather than fatal.
        Ok(bincode::deserialize(&data).unwrap_or_default())
    }

    fn write_file(&self, cache: &CacheFile) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.cache_path, bincode::serialize(cache)?)?;
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
