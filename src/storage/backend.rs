//! Durable settings cache abstraction.
//!
//! This module defines the [`SettingsCache`] trait: a last-write-wins durable blob
//! holding one serialized [`Settings`]. It is a durability mechanism, not a
//! staleness-tracked cache. It is written only after the backend confirms a load or
//! a save, and read only as a fallback when loading from the backend fails.

use crate::domain::error::Result;
use crate::domain::Settings;

/// Durable storage for the last confirmed settings.
///
/// # Implementations
///
/// - [`JsonSettingsCache`](crate::storage::JsonSettingsCache): JSON file with atomic writes (default)
///
/// # Examples
///
/// ```no_run
/// use homescout::storage::{JsonSettingsCache, SettingsCache};
/// use std::path::PathBuf;
///
/// let cache = JsonSettingsCache::new(PathBuf::from("/tmp/homescout/settings.json"))?;
/// let cached = cache.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait SettingsCache: Send {
    /// Returns the stored blob, or `Ok(None)` if nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Settings>>;

    /// Replaces the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous blob is left intact.
    fn store(&mut self, settings: &Settings) -> Result<()>;
}
