//! Audit report caching
//!
//! Reports are keyed by file path and validated by a SHA-256 fingerprint of
//! the document content, the audit mode and the set of disabled checks, so a
//! config change invalidates an entry just like an edit does.

use crate::{AuditMode, AuditReport, Check};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CACHE_VERSION: u32 = 1;
pub const CACHE_FILENAME: &str = ".pageaudit-cache.json";

/// Cache entry for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fingerprint: String,
    report: AuditReport,
    /// Unix timestamp when cached
    cached_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    /// Crate version that produced the entries; rule changes between
    /// releases invalidate everything
    tool_version: String,
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: HashMap::new(),
        }
    }
}

/// Cache manager for audit reports
pub struct AuditCache {
    cache_path: PathBuf,
    data: CacheData,
    dirty: bool,
    enabled: bool,
}

impl AuditCache {
    /// Open (or start) the cache stored in `project_root`
    pub fn new(project_root: &Path) -> Self {
        let cache_path = project_root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path).unwrap_or_default();

        Self {
            cache_path,
            data,
            dirty: false,
            enabled: true,
        }
    }

    /// Create a disabled cache (no-op)
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            data: CacheData::default(),
            dirty: false,
            enabled: false,
        }
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;

        if data.version != CACHE_VERSION || data.tool_version != env!("CARGO_PKG_VERSION") {
            debug!(path = %path.display(), "discarding cache from another version");
            return None;
        }

        Some(data)
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        if !self.enabled || !self.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;

        Ok(())
    }

    /// SHA-256 over mode, sorted disabled check ids and content
    fn fingerprint(content: &str, mode: AuditMode, disabled: &HashSet<Check>) -> String {
        let mut checks: Vec<String> = disabled.iter().map(Check::to_string).collect();
        checks.sort();

        let mut hasher = Sha256::new();
        hasher.update(mode.to_string().as_bytes());
        hasher.update([0]);
        hasher.update(checks.join(",").as_bytes());
        hasher.update([0]);
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Get cached report if still valid
    pub fn get(
        &self,
        path: &Path,
        content: &str,
        mode: AuditMode,
        disabled: &HashSet<Check>,
    ) -> Option<AuditReport> {
        if !self.enabled {
            return None;
        }

        let key = path.to_string_lossy();
        let entry = self.data.entries.get(key.as_ref())?;
        if entry.fingerprint != Self::fingerprint(content, mode, disabled) {
            return None;
        }

        debug!(path = %path.display(), "cache hit");
        Some(entry.report.clone())
    }

    /// Store a report in the cache
    pub fn set(
        &mut self,
        path: &Path,
        content: &str,
        disabled: &HashSet<Check>,
        report: AuditReport,
    ) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry {
            fingerprint: Self::fingerprint(content, report.mode, disabled),
            report,
            cached_at: chrono::Utc::now().timestamp(),
        };

        self.data
            .entries
            .insert(path.to_string_lossy().to_string(), entry);
        self.dirty = true;
    }

    /// Remove entries for files that no longer exist on disk
    pub fn prune_missing(&mut self) {
        if !self.enabled {
            return;
        }

        let before = self.data.entries.len();
        self.data.entries.retain(|k, _| Path::new(k).exists());
        if self.data.entries.len() != before {
            debug!(removed = before - self.data.entries.len(), "pruned stale cache entries");
            self.dirty = true;
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.data.entries.len(),
            enabled: self.enabled,
        }
    }

    /// Clear all cached entries
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.dirty = true;
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuditEngine;

    const PAGE: &str = "<html><head><title>T</title></head><body><h1>H</h1></body></html>";

    fn report(mode: AuditMode) -> AuditReport {
        AuditEngine::new().audit_source(PAGE, mode).unwrap()
    }

    fn none() -> HashSet<Check> {
        HashSet::new()
    }

    #[test]
    fn test_fingerprint_covers_mode_and_checks() {
        let base = AuditCache::fingerprint(PAGE, AuditMode::Seo, &none());
        assert_eq!(base, AuditCache::fingerprint(PAGE, AuditMode::Seo, &none()));
        assert_ne!(base, AuditCache::fingerprint(PAGE, AuditMode::Aeo, &none()));
        let disabled: HashSet<Check> = [Check::MissingH1].into_iter().collect();
        assert_ne!(base, AuditCache::fingerprint(PAGE, AuditMode::Seo, &disabled));
        assert_ne!(base, AuditCache::fingerprint("<p>x</p>", AuditMode::Seo, &none()));
    }

    #[test]
    fn test_cache_disabled() {
        let mut cache = AuditCache::disabled();
        cache.set(Path::new("a.html"), PAGE, &none(), report(AuditMode::Seo));
        assert!(cache
            .get(Path::new("a.html"), PAGE, AuditMode::Seo, &none())
            .is_none());
        assert!(!cache.dirty, "disabled cache should not become dirty");
        assert!(!cache.stats().enabled);
    }

    #[test]
    fn test_cache_hit_and_misses() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path());
        let original = report(AuditMode::Seo);
        cache.set(Path::new("a.html"), PAGE, &none(), original.clone());

        let hit = cache.get(Path::new("a.html"), PAGE, AuditMode::Seo, &none());
        assert_eq!(hit, Some(original));
        assert!(cache
            .get(Path::new("a.html"), "<p>edited</p>", AuditMode::Seo, &none())
            .is_none());
        assert!(cache
            .get(Path::new("a.html"), PAGE, AuditMode::Aeo, &none())
            .is_none());
        assert!(cache
            .get(Path::new("b.html"), PAGE, AuditMode::Seo, &none())
            .is_none());
    }

    #[test]
    fn test_cache_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let mut cache = AuditCache::new(dir.path());
            cache.set(Path::new("a.html"), PAGE, &none(), report(AuditMode::Aeo));
            cache.save().unwrap();
        }
        assert!(dir.path().join(CACHE_FILENAME).exists());

        let cache = AuditCache::new(dir.path());
        let cached = cache.get(Path::new("a.html"), PAGE, AuditMode::Aeo, &none());
        assert_eq!(cached, Some(report(AuditMode::Aeo)));
    }

    #[test]
    fn test_corrupt_cache_starts_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(CACHE_FILENAME), "not json").unwrap();
        assert_eq!(AuditCache::new(dir.path()).stats().entries, 0);
    }

    #[test]
    fn test_cache_clear_and_prune() {
        let dir = tempfile::TempDir::new().unwrap();
        let kept = dir.path().join("a.html");
        fs::write(&kept, "a").unwrap();
        let gone = dir.path().join("b.html");

        let mut cache = AuditCache::new(dir.path());
        cache.set(&kept, "a", &none(), report(AuditMode::Seo));
        cache.set(&gone, "b", &none(), report(AuditMode::Seo));
        assert_eq!(cache.stats().entries, 2);

        cache.prune_missing();
        assert_eq!(cache.stats().entries, 1);
        assert!(cache.get(&kept, "a", AuditMode::Seo, &none()).is_some());

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}
