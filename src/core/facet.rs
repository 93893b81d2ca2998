//! Facet state store
//!
//! Holds the current selection of every filter facet (category, store, price
//! range, rating buckets). Each facet is mutated only through the store's
//! operations; every mutation that changes a facet publishes a [`FacetEvent`]
//! carrying the full updated selection of that facet.

use crate::core::events::{EventBus, FacetEvent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest and highest rating bucket a user can select
pub const RATING_BUCKETS: std::ops::RangeInclusive<u8> = 1..=5;

/// One boolean toggle slot per known id
///
/// Slots are created lazily once the provider's category or store list is
/// known. Registration is idempotent and keeps first-seen order, which is the
/// order checkboxes are listed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    slots: IndexMap<String, bool>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unselected slot for every id not seen before
    ///
    /// Returns how many slots were added.
    pub fn register<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.slots.len();
        for id in ids {
            self.slots.entry(id.into()).or_insert(false);
        }
        self.slots.len() - before
    }

    /// Flip the slot for `id`, returning its new value
    ///
    /// Returns `None` when no slot exists for `id`.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let slot = self.slots.get_mut(id)?;
        *slot = !*slot;
        Some(*slot)
    }

    /// Set the slot for `id`, returning whether the value changed
    ///
    /// Returns `None` when no slot exists for `id`.
    pub fn set(&mut self, id: &str, selected: bool) -> Option<bool> {
        let slot = self.slots.get_mut(id)?;
        let changed = *slot != selected;
        *slot = selected;
        Some(changed)
    }

    /// Unselect every slot, returning whether anything was selected
    pub fn clear(&mut self) -> bool {
        let mut changed = false;
        for slot in self.slots.values_mut() {
            changed |= std::mem::replace(slot, false);
        }
        changed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.slots.get(id).copied().unwrap_or(false)
    }

    /// Ids whose slot is selected
    pub fn selected(&self) -> BTreeSet<String> {
        self.slots
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Slots in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.slots.iter().map(|(id, selected)| (id.as_str(), *selected))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Inclusive price bounds
///
/// An unset lower bound is `0` and an unset upper bound is `+infinity`. The
/// upper bound serializes as `null` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub from: f64,
    #[serde(default = "unbounded", with = "upper_bound")]
    pub to: f64,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

impl PriceRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Whether `price` lies within the bounds
    ///
    /// Inverted bounds (`from > to`) contain nothing.
    pub fn contains(&self, price: f64) -> bool {
        self.from <= price && price <= self.to
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: f64::INFINITY,
        }
    }
}

mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Five fixed rating bucket slots, 1 through 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingBuckets {
    slots: [bool; 5],
}

impl RatingBuckets {
    fn index(bucket: u8) -> Option<usize> {
        RATING_BUCKETS
            .contains(&bucket)
            .then(|| usize::from(bucket - 1))
    }

    pub fn toggle(&mut self, bucket: u8) -> Option<bool> {
        let slot = &mut self.slots[Self::index(bucket)?];
        *slot = !*slot;
        Some(*slot)
    }

    pub fn set(&mut self, bucket: u8, selected: bool) -> Option<bool> {
        let slot = &mut self.slots[Self::index(bucket)?];
        let changed = *slot != selected;
        *slot = selected;
        Some(changed)
    }

    pub fn is_selected(&self, bucket: u8) -> bool {
        Self::index(bucket).is_some_and(|i| self.slots[i])
    }

    pub fn selected(&self) -> BTreeSet<u8> {
        RATING_BUCKETS.filter(|b| self.is_selected(*b)).collect()
    }

    fn clear(&mut self) -> bool {
        let changed = self.slots.iter().any(|s| *s);
        self.slots = [false; 5];
        changed
    }
}

/// Snapshot of every facet, as consumed by the filter pipeline
///
/// Empty sets mean "no filter" for that facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSelection {
    #[serde(default)]
    pub category_ids: BTreeSet<String>,
    #[serde(default)]
    pub store_ids: BTreeSet<String>,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub rating_buckets: BTreeSet<u8>,
}

impl FacetSelection {
    /// Whether no facet restricts the result
    pub fn is_pass_through(&self) -> bool {
        self.category_ids.is_empty()
            && self.store_ids.is_empty()
            && self.price_range.is_unbounded()
            && self.rating_buckets.is_empty()
    }
}

/// Owner of all facet state for one browsing session
#[derive(Debug)]
pub struct FacetStore {
    categories: SelectionMap,
    stores: SelectionMap,
    price: PriceRange,
    ratings: RatingBuckets,
    bus: EventBus,
    revision: u64,
}

impl FacetStore {
    pub fn new(bus: EventBus) -> Self {
        Self {
            categories: SelectionMap::new(),
            stores: SelectionMap::new(),
            price: PriceRange::default(),
            ratings: RatingBuckets::default(),
            bus,
            revision: 0,
        }
    }

    /// Counter bumped on every selection change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of the whole selection
    pub fn selection(&self) -> FacetSelection {
        FacetSelection {
            category_ids: self.categories.selected(),
            store_ids: self.stores.selected(),
            price_range: self.price,
            rating_buckets: self.ratings.selected(),
        }
    }

    pub fn register_categories<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.register(ids)
    }

    pub fn register_stores<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores.register(ids)
    }

    pub fn categories(&self) -> &SelectionMap {
        &self.categories
    }

    pub fn stores(&self) -> &SelectionMap {
        &self.stores
    }

    pub fn price_range(&self) -> PriceRange {
        self.price
    }

    pub fn rating_buckets(&self) -> &RatingBuckets {
        &self.ratings
    }

    pub fn toggle_category(&mut self, id: &str) -> bool {
        match self.categories.toggle(id) {
            Some(_) => {
                self.categories_changed();
                true
            }
            None => {
                tracing::warn!(category_id = id, "ignoring toggle of unknown category");
                false
            }
        }
    }

    pub fn set_category(&mut self, id: &str, selected: bool) -> bool {
        match self.categories.set(id, selected) {
            Some(true) => {
                self.categories_changed();
                true
            }
            Some(false) => false,
            None => {
                tracing::warn!(category_id = id, "ignoring selection of unknown category");
                false
            }
        }
    }

    pub fn toggle_store(&mut self, id: &str) -> bool {
        match self.stores.toggle(id) {
            Some(_) => {
                self.stores_changed();
                true
            }
            None => {
                tracing::warn!(store_id = id, "ignoring toggle of unknown store");
                false
            }
        }
    }

    pub fn set_store(&mut self, id: &str, selected: bool) -> bool {
        match self.stores.set(id, selected) {
            Some(true) => {
                self.stores_changed();
                true
            }
            Some(false) => false,
            None => {
                tracing::warn!(store_id = id, "ignoring selection of unknown store");
                false
            }
        }
    }

    /// Replace the price range
    ///
    /// Inverted ranges are accepted; they simply match nothing.
    pub fn set_price_range(&mut self, range: PriceRange) -> bool {
        if self.price == range {
            return false;
        }
        self.price = range;
        self.touch(FacetEvent::Price { range });
        true
    }

    pub fn set_price_from(&mut self, from: f64) -> bool {
        self.set_price_range(PriceRange::new(from, self.price.to))
    }

    pub fn set_price_to(&mut self, to: f64) -> bool {
        self.set_price_range(PriceRange::new(self.price.from, to))
    }

    pub fn toggle_rating(&mut self, bucket: u8) -> bool {
        match self.ratings.toggle(bucket) {
            Some(_) => {
                self.ratings_changed();
                true
            }
            None => {
                tracing::warn!(bucket, "ignoring toggle of rating bucket outside 1..=5");
                false
            }
        }
    }

    pub fn set_rating(&mut self, bucket: u8, selected: bool) -> bool {
        match self.ratings.set(bucket, selected) {
            Some(true) => {
                self.ratings_changed();
                true
            }
            Some(false) => false,
            None => {
                tracing::warn!(bucket, "ignoring selection of rating bucket outside 1..=5");
                false
            }
        }
    }

    /// Reset every facet to pass-through
    pub fn clear(&mut self) -> bool {
        let mut changed = self.categories.clear();
        changed |= self.stores.clear();
        changed |= self.ratings.clear();
        if !self.price.is_unbounded() {
            self.price = PriceRange::default();
            changed = true;
        }
        if changed {
            self.touch(FacetEvent::Cleared {
                selection: self.selection(),
            });
        }
        changed
    }

    fn categories_changed(&mut self) {
        let selected = self.categories.selected();
        self.touch(FacetEvent::Categories { selected });
    }

    fn stores_changed(&mut self) {
        let selected = self.stores.selected();
        self.touch(FacetEvent::Stores { selected });
    }

    fn ratings_changed(&mut self) {
        let selected = self.ratings.selected();
        self.touch(FacetEvent::Ratings { selected });
    }

    fn touch(&mut self, event: FacetEvent) {
        self.revision += 1;
        tracing::debug!(revision = self.revision, ?event, "facet selection changed");
        self.bus.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::BrowserEvent;

    fn store() -> FacetStore {
        let mut store = FacetStore::new(EventBus::new(64));
        store.register_categories(["c1", "c2", "c3"]);
        store.register_stores(["s1", "s2"]);
        store
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut map = SelectionMap::new();
        assert_eq!(map.register(["a", "b"]), 2);
        map.toggle("a");

        assert_eq!(map.register(["a", "b", "c"]), 1);
        assert_eq!(map.len(), 3);
        assert!(map.is_selected("a"));
        let order: Vec<&str> = map.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_unknown_slot() {
        let mut map = SelectionMap::new();
        assert_eq!(map.toggle("missing"), None);
        assert!(map.selected().is_empty());
    }

    #[test]
    fn test_price_range_defaults_and_contains() {
        let range = PriceRange::default();
        assert_eq!(range.from, 0.0);
        assert!(range.to.is_infinite());
        assert!(range.contains(0.0));
        assert!(range.contains(1e12));

        let inverted = PriceRange::new(50.0, 10.0);
        assert!(!inverted.contains(30.0));
        assert!(!inverted.contains(10.0));
        assert!(!inverted.contains(50.0));
    }

    #[test]
    fn test_price_range_serializes_open_upper_bound_as_null() {
        let json = serde_json::to_value(PriceRange::default()).unwrap();
        assert_eq!(json, serde_json::json!({"from": 0.0, "to": null}));

        let parsed: PriceRange = serde_json::from_value(serde_json::json!({"from": 5})).unwrap();
        assert_eq!(parsed, PriceRange::new(5.0, f64::INFINITY));
    }

    #[test]
    fn test_rating_buckets_bounds() {
        let mut ratings = RatingBuckets::default();
        assert_eq!(ratings.toggle(0), None);
        assert_eq!(ratings.toggle(6), None);
        assert_eq!(ratings.toggle(5), Some(true));
        assert_eq!(ratings.selected(), BTreeSet::from([5]));
    }

    #[test]
    fn test_toggle_category_publishes_full_selection() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let mut store = FacetStore::new(bus);
        store.register_categories(["c1", "c2"]);

        assert!(store.toggle_category("c1"));
        assert!(store.toggle_category("c2"));

        rx.try_recv().unwrap();
        let latest = rx.try_recv().unwrap();
        assert_eq!(
            latest.event,
            BrowserEvent::Facet(FacetEvent::Categories {
                selected: BTreeSet::from(["c1".to_string(), "c2".to_string()]),
            })
        );
    }

    #[test]
    fn test_unknown_ids_do_not_change_revision() {
        let mut store = store();
        assert!(!store.toggle_category("nope"));
        assert!(!store.toggle_store("nope"));
        assert!(!store.toggle_rating(9));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_set_without_change_is_silent() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let mut store = FacetStore::new(bus);
        store.register_stores(["s1"]);

        assert!(!store.set_store("s1", false));
        assert!(!store.set_price_range(PriceRange::default()));
        assert!(rx.try_recv().is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_selection_snapshot() {
        let mut store = store();
        store.toggle_category("c2");
        store.set_store("s1", true);
        store.set_price_from(10.0);
        store.set_price_to(99.0);
        store.set_rating(4, true);

        let selection = store.selection();
        assert_eq!(selection.category_ids, BTreeSet::from(["c2".to_string()]));
        assert_eq!(selection.store_ids, BTreeSet::from(["s1".to_string()]));
        assert_eq!(selection.price_range, PriceRange::new(10.0, 99.0));
        assert_eq!(selection.rating_buckets, BTreeSet::from([4]));
        assert!(!selection.is_pass_through());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = store();
        store.toggle_category("c1");
        store.toggle_rating(3);
        store.set_price_to(20.0);

        assert!(store.clear());
        assert!(store.selection().is_pass_through());
        assert!(!store.clear());
    }

    #[test]
    fn test_reregistering_keeps_selection() {
        let mut store = store();
        store.toggle_category("c3");

        assert_eq!(store.register_categories(["c1", "c2", "c3", "c4"]), 1);
        assert_eq!(store.categories().len(), 4);
        assert!(store.categories().is_selected("c3"));
    }
}
