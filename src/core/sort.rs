//! Sort specifications and the active sort selection

use crate::core::model::ProductRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label of the sort option selected when a session starts
pub const DEFAULT_SORT_LABEL: &str = "Featured";

/// Product field a sort can be keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    FeatureValue,
    Price,
    RatingValue,
}

impl SortField {
    fn key(self, product: &ProductRecord) -> f64 {
        match self {
            SortField::FeatureValue => product.feature_value,
            SortField::Price => product.price,
            SortField::RatingValue => product.rating_value,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Field and direction of a sort
///
/// # Format
///
/// ```yaml
/// sortBy: price
/// order: asc
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(sort_by: SortField, order: SortOrder) -> Self {
        Self { sort_by, order }
    }

    pub fn asc(sort_by: SortField) -> Self {
        Self::new(sort_by, SortOrder::Asc)
    }

    pub fn desc(sort_by: SortField) -> Self {
        Self::new(sort_by, SortOrder::Desc)
    }

    /// Compare two products by this spec
    ///
    /// Descending order flips the operands instead of reversing the result of
    /// a full comparison, so equal keys still compare `Equal` and a stable sort
    /// keeps them in input order.
    pub fn compare(&self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        let (left, right) = (self.sort_by.key(a), self.sort_by.key(b));
        match self.order {
            SortOrder::Asc => left.total_cmp(&right),
            SortOrder::Desc => right.total_cmp(&left),
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::desc(SortField::FeatureValue)
    }
}

/// The sort options offered out of the box, in display order
pub fn default_sort_options() -> IndexMap<String, SortSpec> {
    IndexMap::from([
        (
            DEFAULT_SORT_LABEL.to_string(),
            SortSpec::desc(SortField::FeatureValue),
        ),
        (
            "Price: Low to High".to_string(),
            SortSpec::asc(SortField::Price),
        ),
        (
            "Price: High to Low".to_string(),
            SortSpec::desc(SortField::Price),
        ),
        (
            "Avg. Rating".to_string(),
            SortSpec::desc(SortField::RatingValue),
        ),
    ])
}

/// Currently selected sort option
///
/// Exactly one label is active at a time. The option map comes from the
/// catalog provider; until it is loaded the state falls back to featured
/// order.
#[derive(Debug, Clone)]
pub struct SortState {
    options: IndexMap<String, SortSpec>,
    active: String,
}

impl SortState {
    /// Create a state over `options`, activating `preferred` when offered
    ///
    /// Falls back to the first offered label when `preferred` is absent.
    pub fn new(options: IndexMap<String, SortSpec>, preferred: &str) -> Self {
        let active = if options.contains_key(preferred) {
            preferred.to_string()
        } else {
            options
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| preferred.to_string())
        };

        Self { options, active }
    }

    /// Replace the offered options, keeping the active label if still offered
    pub fn replace_options(&mut self, options: IndexMap<String, SortSpec>, preferred: &str) {
        let keep = options.contains_key(&self.active);
        let active = std::mem::take(&mut self.active);
        *self = Self::new(options, if keep { &active } else { preferred });
    }

    /// Activate the option named `label`
    ///
    /// Returns `false` and leaves the selection untouched for labels that are
    /// not offered.
    pub fn select(&mut self, label: &str) -> bool {
        if !self.options.contains_key(label) {
            tracing::warn!(label, "ignoring unknown sort option");
            return false;
        }
        if self.active == label {
            return false;
        }
        self.active = label.to_string();
        true
    }

    pub fn active_label(&self) -> &str {
        &self.active
    }

    /// Spec of the active option
    pub fn spec(&self) -> SortSpec {
        self.options.get(&self.active).copied().unwrap_or_default()
    }

    pub fn options(&self) -> &IndexMap<String, SortSpec> {
        &self.options
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(default_sort_options(), DEFAULT_SORT_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, price: f64) -> ProductRecord {
        ProductRecord::new(id, id, price, "c1")
    }

    #[test]
    fn test_compare_ascending_and_descending() {
        let cheap = priced("a", 5.0);
        let dear = priced("b", 50.0);

        assert_eq!(
            SortSpec::asc(SortField::Price).compare(&cheap, &dear),
            Ordering::Less
        );
        assert_eq!(
            SortSpec::desc(SortField::Price).compare(&cheap, &dear),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_ties_are_equal_in_both_directions() {
        let a = priced("a", 10.0);
        let b = priced("b", 10.0);

        assert_eq!(SortSpec::asc(SortField::Price).compare(&a, &b), Ordering::Equal);
        assert_eq!(SortSpec::desc(SortField::Price).compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_sort_spec_serde_format() {
        let spec: SortSpec = serde_json::from_str(r#"{"sortBy":"ratingValue","order":"desc"}"#)
            .unwrap();
        assert_eq!(spec, SortSpec::desc(SortField::RatingValue));
    }

    #[test]
    fn test_state_defaults_to_featured() {
        let state = SortState::default();
        assert_eq!(state.active_label(), "Featured");
        assert_eq!(state.spec(), SortSpec::desc(SortField::FeatureValue));
    }

    #[test]
    fn test_state_falls_back_to_first_option() {
        let options = IndexMap::from([(
            "Cheapest".to_string(),
            SortSpec::asc(SortField::Price),
        )]);
        let state = SortState::new(options, DEFAULT_SORT_LABEL);

        assert_eq!(state.active_label(), "Cheapest");
    }

    #[test]
    fn test_state_without_options_uses_featured_order() {
        let state = SortState::new(IndexMap::new(), DEFAULT_SORT_LABEL);
        assert_eq!(state.spec(), SortSpec::default());
    }

    #[test]
    fn test_select_unknown_label_is_ignored() {
        let mut state = SortState::default();

        assert!(!state.select("Newest"));
        assert_eq!(state.active_label(), "Featured");

        assert!(state.select("Price: Low to High"));
        assert_eq!(state.spec(), SortSpec::asc(SortField::Price));

        assert!(!state.select("Price: Low to High"));
    }

    #[test]
    fn test_replace_options_keeps_active_label() {
        let mut state = SortState::default();
        state.select("Avg. Rating");

        state.replace_options(default_sort_options(), DEFAULT_SORT_LABEL);
        assert_eq!(state.active_label(), "Avg. Rating");

        state.replace_options(
            IndexMap::from([(
                DEFAULT_SORT_LABEL.to_string(),
                SortSpec::default(),
            )]),
            DEFAULT_SORT_LABEL,
        );
        assert_eq!(state.active_label(), "Featured");
    }
}
