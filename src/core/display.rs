//! Display join mapper
//!
//! Joins filtered products against the category collection and derives the
//! star-fill vector used to render ratings. The join runs over the whole
//! filtered list; [`page_window`] then cuts out the current page.

use crate::core::facet::RATING_BUCKETS;
use crate::core::model::{CategoryRecord, ProductRecord};
use crate::core::page::PageState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fill value of each of the five rating stars
pub type StarFill = [f64; 5];

/// Render-ready projection of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: String,
    pub name: String,
    pub feature_value: f64,
    pub image_url: String,
    pub price: f64,
    pub rating_value: f64,
    pub rating_count: u32,
    pub store_ids: Vec<String>,

    /// Joined category name, absent when the category id is unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    pub rating_options: StarFill,
}

/// Star fills for a rating value
///
/// Star `i` (0-based) is full when the rating reaches `i + 1`, half when
/// the rating lies strictly between `i` and `i + 1`, empty otherwise.
pub fn rating_options(rating_value: f64) -> StarFill {
    std::array::from_fn(|i| {
        let star = i as f64;
        if rating_value >= star + 1.0 {
            1.0
        } else if rating_value > star {
            0.5
        } else {
            0.0
        }
    })
}

/// A selectable rating bucket with its own star vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOption {
    pub bucket: u8,
    pub stars: StarFill,
}

/// The five rating filter options, highest bucket first
pub fn rating_threshold_options() -> Vec<RatingOption> {
    RATING_BUCKETS
        .rev()
        .map(|bucket| RatingOption {
            bucket,
            stars: rating_options(f64::from(bucket)),
        })
        .collect()
}

/// Category id to name lookup, built once per category list
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    names: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn new(categories: &[CategoryRecord]) -> Self {
        Self {
            names: categories
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
        }
    }

    pub fn name(&self, category_id: &str) -> Option<&str> {
        self.names.get(category_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl DisplayRecord {
    pub fn from_product(product: &ProductRecord, lookup: &CategoryLookup) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            feature_value: product.feature_value,
            image_url: product.image_url.clone(),
            price: product.price,
            rating_value: product.rating_value,
            rating_count: product.rating_count,
            store_ids: product.store_ids.clone(),
            category_name: lookup.name(&product.category_id).map(str::to_string),
            rating_options: rating_options(product.rating_value),
        }
    }
}

/// Join every product against the category lookup, keeping order
///
/// Products with an unknown category are kept with no category name.
pub fn join_display(products: &[ProductRecord], lookup: &CategoryLookup) -> Vec<DisplayRecord> {
    products
        .iter()
        .map(|product| DisplayRecord::from_product(product, lookup))
        .collect()
}

/// Records visible on the current page
///
/// Out-of-range pages give a short or empty slice.
pub fn page_window<T: Clone>(records: &[T], page: &PageState) -> Vec<T> {
    let range = page.window();
    let start = range.start.min(records.len());
    let end = range.end.min(records.len());
    records[start..end].to_vec()
}
