//! Favorite flag synchronization.
//!
//! The backend owns the favorite flag. [`FavoriteSync`] tracks toggles in flight,
//! applies each authoritative answer in place to every held view, and owns the
//! `favorites` view, which is only ever replaced by a backend reload.
//!
//! Toggles are not serialized per item: when two toggles for the same id overlap,
//! whichever response arrives last wins.

use std::collections::HashMap;

use super::engine::FilterEngine;
use crate::domain::Property;

#[derive(Debug, Clone, Default)]
pub struct FavoriteSync {
    favorites: Vec<Property>,
    /// Toggle requests awaiting a response, per item id.
    outstanding: HashMap<String, usize>,
}

impl FavoriteSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a toggle for `id` was issued.
    ///
    /// Returns `true` if another toggle for the same id was already in flight.
    pub fn request_toggle(&mut self, id: &str) -> bool {
        let count = self.outstanding.entry(id.to_string()).or_insert(0);
        *count += 1;
        let racing = *count > 1;
        if racing {
            tracing::warn!(id, in_flight = *count, "overlapping favorite toggles; last response wins");
        }
        racing
    }

    /// Applies an authoritative flag to every view holding `id`.
    ///
    /// Returns the number of items updated. The caller is expected to reload the
    /// `favorites` view afterwards.
    pub fn apply_toggled(&mut self, engine: &mut FilterEngine, id: &str, favorited: bool) -> usize {
        self.settle(id);
        let mut updated = engine.set_favorited(id, favorited);
        for item in self.favorites.iter_mut().filter(|item| item.id == id) {
            item.favorited = favorited;
            updated += 1;
        }
        tracing::debug!(id, favorited, updated, "favorite flag applied");
        updated
    }

    /// Settles a failed toggle. No view is touched.
    pub fn toggle_failed(&mut self, id: &str) {
        self.settle(id);
    }

    /// Replaces the `favorites` view with a backend reload.
    pub fn replace_favorites(&mut self, favorites: Vec<Property>) {
        tracing::debug!(count = favorites.len(), "favorites reloaded");
        self.favorites = favorites;
    }

    fn settle(&mut self, id: &str) {
        if let Some(count) = self.outstanding.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.outstanding.remove(id);
            }
        }
    }

    #[must_use]
    pub fn favorites(&self) -> &[Property] {
        &self.favorites
    }

    #[must_use]
    pub fn is_outstanding(&self, id: &str) -> bool {
        self.outstanding.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::engine::ClearPolicy;
    use std::time::Duration;

    fn engine_with(ids: &[&str]) -> FilterEngine {
        let mut engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
        engine.load(ids.iter().map(|id| Property::new(*id)).collect());
        engine
    }

    #[test]
    fn toggled_flag_reaches_every_view() {
        let mut engine = engine_with(&["a", "b"]);
        let mut sync = FavoriteSync::new();
        sync.replace_favorites(vec![Property::new("b")]);

        sync.request_toggle("b");
        assert!(sync.is_outstanding("b"));
        assert_eq!(sync.apply_toggled(&mut engine, "b", true), 3);

        assert!(!sync.is_outstanding("b"));
        assert!(engine.all().iter().any(|p| p.id == "b" && p.favorited));
        assert!(engine.filtered().iter().any(|p| p.id == "b" && p.favorited));
        assert!(sync.favorites()[0].favorited);
    }

    #[test]
    fn failed_toggle_leaves_views_untouched() {
        let engine = engine_with(&["a"]);
        let mut sync = FavoriteSync::new();
        sync.request_toggle("a");
        sync.toggle_failed("a");
        assert!(!sync.is_outstanding("a"));
        assert!(engine.all().iter().chain(engine.filtered()).all(|p| !p.favorited));
    }

    #[test]
    fn overlapping_toggles_apply_last_response() {
        let mut engine = engine_with(&["a"]);
        let mut sync = FavoriteSync::new();
        assert!(!sync.request_toggle("a"));
        assert!(sync.request_toggle("a"));

        sync.apply_toggled(&mut engine, "a", true);
        assert!(sync.is_outstanding("a"));
        sync.apply_toggled(&mut engine, "a", false);
        assert!(!sync.is_outstanding("a"));
        assert!(!engine.all()[0].favorited);
    }
}
