//! JSON file-based settings cache.
//!
//! This module provides a small, human-readable cache implementation using JSON
//! serialization. It uses atomic file writes (write-to-temp + rename) so a crash
//! mid-write never leaves a half-written blob behind.

use crate::domain::error::{HomescoutError, Result};
use crate::domain::Settings;
use crate::storage::backend::SettingsCache;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheFile {
    /// Version of the cache format for future migrations.
    version: u32,

    settings: Settings,

    /// Unix timestamp of the write, for inspection only.
    #[serde(default)]
    written_at: i64,
}

const CACHE_FORMAT_VERSION: u32 = 1;

/// JSON file settings cache.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "settings": {
///     "update_interval": 1,
///     "search_radius": 20,
///     "search_time_range": 365
///   },
///   "written_at": 1717171717
/// }
/// ```
#[derive(Debug)]
pub struct JsonSettingsCache {
    file_path: PathBuf,
}

impl JsonSettingsCache {
    /// Creates a cache backed by `file_path`.
    ///
    /// Parent directories are created automatically. The file itself is only
    /// created on the first [`store`](SettingsCache::store).
    ///
    /// # Errors
    ///
    /// Returns an error if parent directory creation fails.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing settings cache");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SettingsCache for JsonSettingsCache {
    fn load(&self) -> Result<Option<Settings>> {
        let _span = tracing::debug_span!("json_cache_load", path = ?self.file_path).entered();

        if !self.file_path.exists() {
            tracing::debug!("no cached settings");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        let file: CacheFile = serde_json::from_str(&contents)
            .map_err(|e| HomescoutError::Storage(format!("failed to parse cached settings: {e}")))?;

        tracing::debug!(version = file.version, written_at = file.written_at, "loaded cached settings");
        Ok(Some(file.settings))
    }

    fn store(&mut self, settings: &Settings) -> Result<()> {
        let _span = tracing::debug_span!("json_cache_store", path = ?self.file_path).entered();

        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            settings: *settings,
            written_at: chrono::Utc::now().timestamp(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| HomescoutError::Storage(format!("failed to serialize settings: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!("settings cached");
        Ok(())
    }
}
