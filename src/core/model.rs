//! Catalog records consumed by the browsing pipeline

use serde::{Deserialize, Serialize};

/// A product as supplied by the catalog provider
///
/// Products are immutable once loaded. Field names follow the camelCase
/// convention on the wire so JSON fixtures can be loaded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Rank used by the "Featured" sort
    #[serde(default)]
    pub feature_value: f64,

    #[serde(default)]
    pub image_url: String,

    /// Price, never negative
    pub price: f64,

    /// Average rating in `[0, 5]`
    #[serde(default)]
    pub rating_value: f64,

    /// Number of ratings behind `rating_value`
    #[serde(default)]
    pub rating_count: u32,

    /// Foreign key into the category collection
    pub category_id: String,

    /// Foreign keys into the store collection
    #[serde(default)]
    pub store_ids: Vec<String>,
}

impl ProductRecord {
    /// Create a product with the required fields, leaving the rest at defaults
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            feature_value: 0.0,
            image_url: String::new(),
            price,
            rating_value: 0.0,
            rating_count: 0,
            category_id: category_id.into(),
            store_ids: Vec::new(),
        }
    }

    pub fn with_feature_value(mut self, feature_value: f64) -> Self {
        self.feature_value = feature_value;
        self
    }

    pub fn with_rating(mut self, rating_value: f64, rating_count: u32) -> Self {
        self.rating_value = rating_value;
        self.rating_count = rating_count;
        self
    }

    pub fn with_stores<I, S>(mut self, store_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_ids = store_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Rating bucket used by the rating facet
    ///
    /// The bucket is the integer floor of the rating, so `4.0` lands in
    /// bucket 4 and `3.99` in bucket 3.
    pub fn rating_bucket(&self) -> u8 {
        self.rating_value.floor().clamp(0.0, 5.0) as u8
    }
}

/// A product category, used for id matching and the display join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A store carrying some of the products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub name: String,
}

impl StoreRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
