//! Backend-authoritative settings with a durable fallback.
//!
//! [`SettingsStore`] holds the client's copy of the scraper [`Settings`]. The copy
//! only changes after the backend confirms a load or a save; there is no optimistic
//! mutation. Every confirmed value is written through to the [`SettingsCache`],
//! which is read back only when a load from the backend fails.

use std::fmt;

use crate::domain::{Result, Settings};
use crate::storage::SettingsCache;

/// Where the current in-memory settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    /// Client defaults; nothing has been loaded.
    Defaults,
    /// Confirmed by the backend.
    Backend,
    /// Restored from the durable cache after a failed load.
    Cache,
}

pub struct SettingsStore {
    current: Settings,
    source: SettingsSource,
    cache: Option<Box<dyn SettingsCache>>,
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("current", &self.current)
            .field("source", &self.source)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl SettingsStore {
    /// Creates a store at client defaults.
    ///
    /// Without a cache, load failures simply keep the prior in-memory copy.
    #[must_use]
    pub fn new(cache: Option<Box<dyn SettingsCache>>) -> Self {
        Self {
            current: Settings::default(),
            source: SettingsSource::Defaults,
            cache,
        }
    }

    /// Adopts settings confirmed by a backend load.
    pub fn apply_loaded(&mut self, settings: Settings) {
        tracing::debug!(?settings, "settings loaded from backend");
        self.adopt(settings);
    }

    /// Falls back to the durable cache after a failed load.
    ///
    /// Returns `true` if the cached copy was adopted. Without a cache entry the
    /// in-memory copy is left untouched.
    pub fn apply_load_failure(&mut self, reason: &str) -> bool {
        tracing::warn!(reason, "failed to load settings from backend");

        let Some(cache) = self.cache.as_ref() else {
            return false;
        };
        match cache.load() {
            Ok(Some(cached)) => {
                tracing::info!(settings = ?cached, "using cached settings");
                self.current = cached;
                self.source = SettingsSource::Cache;
                true
            }
            Ok(None) => {
                tracing::debug!("no cached settings; keeping current copy");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read settings cache");
                false
            }
        }
    }

    /// Validates settings before a save request is issued.
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive values.
    pub fn prepare_save(&self, settings: &Settings) -> Result<()> {
        settings.validate()
    }

    /// Adopts the backend's (possibly normalized) response to a save.
    pub fn apply_saved(&mut self, settings: Settings) {
        tracing::debug!(?settings, "settings saved");
        self.adopt(settings);
    }

    fn adopt(&mut self, settings: Settings) {
        self.current = settings;
        self.source = SettingsSource::Backend;
        if let Some(cache) = self.cache.as_mut() {
            if let Err(e) = cache.store(&settings) {
                tracing::warn!(error = %e, "failed to write settings cache");
            }
        }
    }

    #[must_use]
    pub const fn current(&self) -> Settings {
        self.current
    }

    #[must_use]
    pub const fn source(&self) -> SettingsSource {
        self.source
    }
}
