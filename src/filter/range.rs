//! The predicate mapping and its evaluation.

use std::collections::BTreeMap;

use super::predicate::{ensure_finite, PredicateKey};
use crate::domain::{Property, Result};

/// Current set of min/max predicates.
///
/// Only set entries are stored; an absent key is an unset (inert) predicate. A
/// property passes when every stored predicate is satisfied. A property whose
/// attribute is unknown fails every predicate that references that attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeFilterSet {
    bounds: BTreeMap<PredicateKey, f64>,
}

impl RangeFilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or unsets one predicate.
    ///
    /// Returns `true` if the mapping changed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-finite values; the mapping is untouched.
    pub fn set(&mut self, key: PredicateKey, value: Option<f64>) -> Result<bool> {
        match value {
            Some(raw) => {
                let value = ensure_finite(raw)?;
                Ok(self.bounds.insert(key, value) != Some(value))
            }
            None => Ok(self.bounds.remove(&key).is_some()),
        }
    }

    /// Unsets every predicate. Returns `true` if anything was set.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.bounds.is_empty();
        self.bounds.clear();
        had_any
    }

    #[must_use]
    pub fn get(&self, key: PredicateKey) -> Option<f64> {
        self.bounds.get(&key).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Iterates the set predicates in key order.
    pub fn iter(&self) -> impl Iterator<Item = (PredicateKey, f64)> + '_ {
        self.bounds.iter().map(|(key, value)| (*key, *value))
    }

    /// Evaluates every set predicate against `property` (logical AND).
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        self.bounds.iter().all(|(key, limit)| {
            property
                .attribute(key.attribute)
                .is_some_and(|value| key.bound.admits(value, *limit))
        })
    }

    /// Returns the subsequence of `items` that passes, order preserved.
    #[must_use]
    pub fn apply(&self, items: &[Property]) -> Vec<Property> {
        if self.is_empty() {
            return items.to_vec();
        }
        items
            .iter()
            .filter(|property| self.matches(property))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attribute;

    fn priced(id: &str, price: f64, beds: Option<f64>) -> Property {
        let mut property = Property::new(id);
        property.list_price = Some(price);
        property.beds = beds;
        property
    }

    fn ids(items: &[Property]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    fn sample() -> Vec<Property> {
        vec![
            priced("a", 100_000.0, Some(2.0)),
            priced("b", 250_000.0, None),
            priced("c", 400_000.0, Some(4.0)),
        ]
    }

    #[test]
    fn empty_set_is_identity() {
        let items = sample();
        let filters = RangeFilterSet::new();
        assert_eq!(filters.apply(&items), items);
    }

    #[test]
    fn tightening_a_bound_yields_a_subset() {
        let items = sample();
        let mut filters = RangeFilterSet::new();
        let key = PredicateKey::min(Attribute::ListPrice);

        let mut previous = filters.apply(&items);
        for limit in [50_000.0, 150_000.0, 300_000.0, 500_000.0] {
            filters.set(key, Some(limit)).expect("finite");
            let current = filters.apply(&items);
            assert!(current.iter().all(|p| previous.contains(p)));
            previous = current;
        }
        assert!(previous.is_empty());
    }

    #[test]
    fn unknown_attribute_fails_either_direction() {
        let items = sample();
        for key in [PredicateKey::min(Attribute::Beds), PredicateKey::max(Attribute::Beds)] {
            let mut filters = RangeFilterSet::new();
            filters.set(key, Some(3.0)).expect("finite");
            assert!(!ids(&filters.apply(&items)).contains(&"b"));
        }
    }

    #[test]
    fn predicates_combine_with_and() {
        let items = sample();
        let mut filters = RangeFilterSet::new();
        filters
            .set(PredicateKey::min(Attribute::ListPrice), Some(200_000.0))
            .expect("finite");
        filters
            .set(PredicateKey::min(Attribute::Beds), Some(3.0))
            .expect("finite");
        assert_eq!(ids(&filters.apply(&items)), vec!["c"]);
    }

    #[test]
    fn set_reports_changes_only() {
        let mut filters = RangeFilterSet::new();
        let key = PredicateKey::max(Attribute::Sqft);
        assert!(filters.set(key, Some(2_000.0)).expect("finite"));
        assert!(!filters.set(key, Some(2_000.0)).expect("finite"));
        assert!(filters.set(key, None).expect("unset"));
        assert!(!filters.set(key, None).expect("unset"));
    }

    #[test]
    fn non_finite_value_leaves_mapping_untouched() {
        let mut filters = RangeFilterSet::new();
        let key = PredicateKey::min(Attribute::Baths);
        filters.set(key, Some(2.0)).expect("finite");
        assert!(filters.set(key, Some(f64::NAN)).is_err());
        assert_eq!(filters.get(key), Some(2.0));
    }
}
