//! Filtered view derivation with debounced recomputation.
//!
//! [`FilterEngine`] owns the unrestricted listing view (`all`), the derived
//! restriction (`filtered`), and the predicate mapping that connects them.
//!
//! # Debounce
//!
//! Predicate changes never recompute `filtered` directly. Each change moves the
//! single pending slot to a fresh token and returns a [`ScheduledRecompute`] for
//! the runtime to arm as a timer. When a timer fires, [`FilterEngine::fire`] only
//! commits if its token is still the pending one, so a burst of edits collapses
//! into one trailing recomputation reflecting the last state.
//!
//! `load` always recomputes synchronously. Clearing follows [`ClearPolicy`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Property, Result};
use crate::filter::{PredicateKey, RangeFilterSet};

/// How clearing all predicates is materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Recompute synchronously and cancel any pending recompute.
    #[default]
    Immediate,
    /// Treat a clear like any other predicate change.
    Debounced,
}

/// A recompute the runtime should arm a timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRecompute {
    pub token: u64,
    pub delay: Duration,
}

/// Result of [`FilterEngine::clear_predicates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// `filtered` was recomputed; `cancelled` reports whether a pending
    /// recompute was dropped.
    Recomputed { cancelled: bool },
    /// A debounced recompute was scheduled.
    Scheduled(ScheduledRecompute),
    /// Nothing was set; nothing to do.
    Unchanged,
}

/// Owner of the `all` and `filtered` views.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    all: Vec<Property>,
    filtered: Vec<Property>,
    filters: RangeFilterSet,
    /// Token of the single pending recompute, if any.
    pending: Option<u64>,
    next_token: u64,
    debounce: Duration,
    clear_policy: ClearPolicy,
    recompute_count: u64,
}

impl FilterEngine {
    #[must_use]
    pub fn new(debounce: Duration, clear_policy: ClearPolicy) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            filters: RangeFilterSet::new(),
            pending: None,
            next_token: 0,
            debounce,
            clear_policy,
            recompute_count: 0,
        }
    }

    /// Replaces `all` wholesale and recomputes `filtered` immediately.
    ///
    /// A pending debounced recompute is left armed; when it fires it reads the
    /// `all` current at that moment.
    pub fn load(&mut self, items: Vec<Property>) {
        tracing::debug!(
            item_count = items.len(),
            pending = ?self.pending,
            "loading listings"
        );
        self.all = items;
        self.recompute();
    }

    /// Updates one predicate and schedules a debounced recompute.
    ///
    /// Returns `Ok(None)` when the value is already in place; nothing is scheduled
    /// and any pending recompute stays as it was.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-finite value. The mapping and the
    /// pending slot are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use homescout::app::engine::{ClearPolicy, FilterEngine};
    /// use homescout::filter::PredicateKey;
    /// use std::time::Duration;
    ///
    /// let mut engine = FilterEngine::new(Duration::from_millis(300), ClearPolicy::Immediate);
    /// let key: PredicateKey = "min_price".parse()?;
    /// let scheduled = engine.set_predicate(key, Some(200_000.0))?.expect("changed");
    /// assert!(engine.fire(scheduled.token));
    /// # Ok::<(), homescout::HomescoutError>(())
    /// ```
    pub fn set_predicate(
        &mut self,
        key: PredicateKey,
        value: Option<f64>,
    ) -> Result<Option<ScheduledRecompute>> {
        if !self.filters.set(key, value)? {
            tracing::trace!(%key, "predicate unchanged");
            return Ok(None);
        }
        tracing::debug!(%key, value = ?value, "predicate updated");
        Ok(Some(self.schedule()))
    }

    /// Unsets every predicate according to the configured [`ClearPolicy`].
    pub fn clear_predicates(&mut self) -> ClearOutcome {
        let changed = self.filters.clear();
        match self.clear_policy {
            ClearPolicy::Immediate => {
                let cancelled = self.cancel_pending();
                self.recompute();
                tracing::debug!(changed, cancelled, "predicates cleared");
                ClearOutcome::Recomputed { cancelled }
            }
            ClearPolicy::Debounced if changed => ClearOutcome::Scheduled(self.schedule()),
            ClearPolicy::Debounced => ClearOutcome::Unchanged,
        }
    }

    /// Commits the pending recompute if `token` is still the pending one.
    ///
    /// Returns `false` for a superseded or cancelled token.
    pub fn fire(&mut self, token: u64) -> bool {
        if self.pending != Some(token) {
            tracing::trace!(token, pending = ?self.pending, "ignoring stale recompute");
            return false;
        }
        self.pending = None;
        self.recompute();
        true
    }

    /// Drops the pending recompute. Returns `true` if one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Sets the favorite flag on every held item with `id`, in place.
    ///
    /// Membership and order of `filtered` are unchanged. Returns the number of
    /// items updated across both views.
    pub fn set_favorited(&mut self, id: &str, favorited: bool) -> usize {
        let mut updated = 0;
        for item in self.all.iter_mut().chain(self.filtered.iter_mut()) {
            if item.id == id {
                item.favorited = favorited;
                updated += 1;
            }
        }
        updated
    }

    fn schedule(&mut self) -> ScheduledRecompute {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.pending.replace(token) {
            tracing::trace!(previous, token, "superseding pending recompute");
        }
        ScheduledRecompute {
            token,
            delay: self.debounce,
        }
    }

    fn recompute(&mut self) {
        let _span = tracing::debug_span!("recompute_filtered", predicates = self.filters.len()).entered();
        self.filtered = self.filters.apply(&self.all);
        self.recompute_count += 1;
        tracing::debug!(
            total = self.all.len(),
            visible = self.filtered.len(),
            "filtered view recomputed"
        );
    }

    #[must_use]
    pub fn all(&self) -> &[Property] {
        &self.all
    }

    #[must_use]
    pub fn filtered(&self) -> &[Property] {
        &self.filtered
    }

    #[must_use]
    pub const fn filters(&self) -> &RangeFilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn pending_token(&self) -> Option<u64> {
        self.pending
    }

    /// Number of times `filtered` has been materialized.
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    #[must_use]
    pub const fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attribute;

    fn priced(id: &str, price: f64) -> Property {
        let mut property = Property::new(id);
        property.list_price = Some(price);
        property
    }

    fn engine(policy: ClearPolicy) -> FilterEngine {
        let mut engine = FilterEngine::new(Duration::from_millis(300), policy);
        engine.load(vec![
            priced("a", 100_000.0),
            priced("b", 250_000.0),
            priced("c", 400_000.0),
        ]);
        engine
    }

    fn ids(items: &[Property]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn load_recomputes_synchronously() {
        let engine = engine(ClearPolicy::Immediate);
        assert_eq!(ids(engine.filtered()), vec!["a", "b", "c"]);
        assert_eq!(engine.recompute_count(), 1);
        assert_eq!(engine.pending_token(), None);
    }

    #[test]
    fn burst_commits_only_the_last_token() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::ListPrice);

        let first = engine.set_predicate(key, Some(50_000.0)).expect("ok").expect("changed");
        let second = engine.set_predicate(key, Some(150_000.0)).expect("ok").expect("changed");
        let third = engine.set_predicate(key, Some(300_000.0)).expect("ok").expect("changed");

        assert!(!engine.fire(first.token));
        assert!(!engine.fire(second.token));
        assert_eq!(ids(engine.filtered()), vec!["a", "b", "c"]);
        assert!(engine.fire(third.token));
        assert_eq!(ids(engine.filtered()), vec!["c"]);
        assert_eq!(engine.recompute_count(), 2);
        assert!(!engine.fire(third.token));
    }

    #[test]
    fn same_value_schedules_nothing() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::max(Attribute::ListPrice);
        let scheduled = engine.set_predicate(key, Some(300_000.0)).expect("ok");
        assert!(scheduled.is_some());
        assert_eq!(engine.set_predicate(key, Some(300_000.0)).expect("ok"), None);
        assert_eq!(engine.pending_token(), scheduled.map(|s| s.token));
    }

    #[test]
    fn invalid_value_keeps_pending_slot() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::Sqft);
        let scheduled = engine.set_predicate(key, Some(900.0)).expect("ok").expect("changed");
        assert!(engine.set_predicate(key, Some(f64::INFINITY)).is_err());
        assert_eq!(engine.pending_token(), Some(scheduled.token));
        assert_eq!(engine.filters().get(key), Some(900.0));
    }

    #[test]
    fn immediate_clear_cancels_pending_and_restores_all() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::ListPrice);
        let scheduled = engine.set_predicate(key, Some(200_000.0)).expect("ok").expect("changed");
        assert!(engine.fire(scheduled.token));
        let pending = engine
            .set_predicate(PredicateKey::max(Attribute::ListPrice), Some(300_000.0))
            .expect("ok")
            .expect("changed");

        assert_eq!(engine.clear_predicates(), ClearOutcome::Recomputed { cancelled: true });
        assert_eq!(engine.filtered(), engine.all());
        assert!(!engine.fire(pending.token));
    }

    #[test]
    fn debounced_clear_schedules_when_something_was_set() {
        let mut engine = engine(ClearPolicy::Debounced);
        assert_eq!(engine.clear_predicates(), ClearOutcome::Unchanged);

        let key = PredicateKey::min(Attribute::ListPrice);
        let set = engine.set_predicate(key, Some(200_000.0)).expect("ok").expect("changed");
        assert!(engine.fire(set.token));

        let ClearOutcome::Scheduled(clear) = engine.clear_predicates() else {
            panic!("expected a scheduled recompute");
        };
        assert_eq!(ids(engine.filtered()), vec!["b", "c"]);
        assert!(engine.fire(clear.token));
        assert_eq!(ids(engine.filtered()), vec!["a", "b", "c"]);
    }

    #[test]
    fn pending_recompute_reads_current_all() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::ListPrice);
        let scheduled = engine.set_predicate(key, Some(200_000.0)).expect("ok").expect("changed");

        engine.load(vec![priced("x", 150_000.0), priced("y", 500_000.0)]);
        assert_eq!(engine.pending_token(), Some(scheduled.token));

        assert!(engine.fire(scheduled.token));
        assert_eq!(ids(engine.filtered()), vec!["y"]);
    }

    #[test]
    fn set_favorited_updates_both_views_without_refiltering() {
        let mut engine = engine(ClearPolicy::Immediate);
        let key = PredicateKey::min(Attribute::ListPrice);
        let scheduled = engine.set_predicate(key, Some(200_000.0)).expect("ok").expect("changed");
        engine.fire(scheduled.token);

        assert_eq!(engine.set_favorited("b", true), 2);
        assert_eq!(engine.set_favorited("a", true), 1);
        assert_eq!(engine.set_favorited("missing", true), 0);

        assert_eq!(ids(engine.filtered()), vec!["b", "c"]);
        assert!(engine.filtered()[0].favorited);
        assert!(engine.all().iter().filter(|p| p.id != "c").all(|p| p.favorited));
        assert_eq!(engine.recompute_count(), 2);
    }
}
