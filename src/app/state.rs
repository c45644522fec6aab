//! Application state: the orchestrator's single source of truth.
//!
//! [`AppState`] composes the [`FilterEngine`], the [`FavoriteSync`], and the
//! [`SettingsStore`], together with the request-in-flight flags the event handler
//! needs. Callers only read it; every mutation goes through
//! [`handle_event`](crate::app::handle_event).
//!
//! # Views
//!
//! - `all`: the last property load, in backend order
//! - `filtered`: the subsequence of `all` passing the current predicates
//! - `favorites`: the last favorites reload, independent of the other two
//!
//! # Example
//!
//! ```
//! use homescout::app::{AppState, ClearPolicy, FilterEngine, SettingsStore};
//! use std::time::Duration;
//!
//! let engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
//! let state = AppState::new(engine, SettingsStore::new(None));
//! assert!(state.filtered().is_empty());
//! assert!(!state.is_loading());
//! ```

use super::engine::FilterEngine;
use super::favorites::FavoriteSync;
use super::settings::{SettingsSource, SettingsStore};
use crate::domain::{Property, Settings};
use crate::filter::RangeFilterSet;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    pub(super) engine: FilterEngine,
    pub(super) favorites: FavoriteSync,
    pub(super) settings: SettingsStore,

    /// A property load is in flight.
    pub(super) loading: bool,

    /// A manual scrape is in flight.
    pub(super) refreshing: bool,

    /// Persistent banner text from the last failed property load.
    ///
    /// Cleared by the next successful load.
    pub(super) error: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: FilterEngine, settings: SettingsStore) -> Self {
        Self {
            engine,
            favorites: FavoriteSync::new(),
            settings,
            loading: false,
            refreshing: false,
            error: None,
        }
    }

    #[must_use]
    pub fn all(&self) -> &[Property] {
        self.engine.all()
    }

    #[must_use]
    pub fn filtered(&self) -> &[Property] {
        self.engine.filtered()
    }

    #[must_use]
    pub fn favorites(&self) -> &[Property] {
        self.favorites.favorites()
    }

    #[must_use]
    pub const fn filters(&self) -> &RangeFilterSet {
        self.engine.filters()
    }

    #[must_use]
    pub const fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    #[must_use]
    pub const fn settings(&self) -> Settings {
        self.settings.current()
    }

    #[must_use]
    pub const fn settings_source(&self) -> SettingsSource {
        self.settings.source()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Looks up a listing in `all` by id.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&Property> {
        self.engine.all().iter().find(|property| property.id == id)
    }

    #[must_use]
    pub fn is_favorite_pending(&self, id: &str) -> bool {
        self.favorites.is_outstanding(id)
    }
}
