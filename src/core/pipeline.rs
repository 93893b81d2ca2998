//! Filter-sort pipeline
//!
//! Turns the full product collection plus the current facet selection and
//! sort spec into the ordered result list. Filtering is conjunctive: a product
//! is kept only when every facet accepts it, and a facet with an empty
//! selection accepts everything. The predicates are independent, so the order
//! they run in never changes the result.

use crate::core::facet::{FacetSelection, PriceRange};
use crate::core::model::ProductRecord;
use crate::core::sort::SortSpec;
use std::collections::BTreeSet;

/// A single facet test
pub trait ProductPredicate {
    fn matches(&self, product: &ProductRecord) -> bool;
}

/// Keeps products whose category is selected
pub struct CategoryPredicate<'a>(pub &'a BTreeSet<String>);

impl ProductPredicate for CategoryPredicate<'_> {
    fn matches(&self, product: &ProductRecord) -> bool {
        self.0.is_empty() || self.0.contains(&product.category_id)
    }
}

/// Keeps products sold by at least one selected store
pub struct StorePredicate<'a>(pub &'a BTreeSet<String>);

impl ProductPredicate for StorePredicate<'_> {
    fn matches(&self, product: &ProductRecord) -> bool {
        self.0.is_empty() || product.store_ids.iter().any(|id| self.0.contains(id))
    }
}

/// Keeps products priced within the range, bounds included
pub struct PricePredicate(pub PriceRange);

impl ProductPredicate for PricePredicate {
    fn matches(&self, product: &ProductRecord) -> bool {
        self.0.contains(product.price)
    }
}

/// Keeps products whose rating bucket is selected
pub struct RatingPredicate<'a>(pub &'a BTreeSet<u8>);

impl ProductPredicate for RatingPredicate<'_> {
    fn matches(&self, product: &ProductRecord) -> bool {
        self.0.is_empty() || self.0.contains(&product.rating_bucket())
    }
}

/// Whether `product` passes every facet in `selection`
pub fn matches_selection(product: &ProductRecord, selection: &FacetSelection) -> bool {
    let chain: [&dyn ProductPredicate; 4] = [
        &CategoryPredicate(&selection.category_ids),
        &StorePredicate(&selection.store_ids),
        &PricePredicate(selection.price_range),
        &RatingPredicate(&selection.rating_buckets),
    ];
    chain.iter().all(|predicate| predicate.matches(product))
}

/// Filter `products` by `selection`, keeping input order
pub fn apply_filters(products: &[ProductRecord], selection: &FacetSelection) -> Vec<ProductRecord> {
    products
        .iter()
        .filter(|product| matches_selection(product, selection))
        .cloned()
        .collect()
}

/// Stable-sort `products` in place by `spec`
pub fn apply_sort(products: &mut [ProductRecord], spec: &SortSpec) {
    products.sort_by(|a, b| spec.compare(a, b));
}

/// Full recomputation of the ordered result list
///
/// Always recomputes from scratch; calling it twice with the same inputs
/// yields equal output.
pub fn filter_and_sort(
    products: &[ProductRecord],
    selection: &FacetSelection,
    spec: &SortSpec,
) -> Vec<ProductRecord> {
    let mut filtered = apply_filters(products, selection);
    apply_sort(&mut filtered, spec);
    filtered
}
