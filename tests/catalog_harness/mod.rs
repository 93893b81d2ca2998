//! Shared fixtures for catalog browsing tests
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod catalog_harness;
//! use catalog_harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use catalog_facets::prelude::*;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// `count` products priced 1..=count, featured in reverse id order
///
/// Even products are in category `c1` and store `s1`, odd ones in `c2`/`s2`.
/// Ratings cycle through 0.5, 1.5, ... 4.5, 5.0.
pub fn numbered_products(count: usize) -> Vec<ProductRecord> {
    (1..=count)
        .map(|i| {
            let (category, store) = if i % 2 == 0 { ("c1", "s1") } else { ("c2", "s2") };
            let rating = match i % 6 {
                0 => 5.0,
                r => r as f64 - 0.5,
            };
            ProductRecord::new(format!("p{i}"), format!("Product {i}"), i as f64, category)
                .with_feature_value(i as f64)
                .with_rating(rating, i as u32)
                .with_stores([store])
        })
        .collect()
}

pub fn categories() -> Vec<CategoryRecord> {
    vec![
        CategoryRecord::new("c1", "Shoes"),
        CategoryRecord::new("c2", "Bags"),
    ]
}

pub fn stores() -> Vec<StoreRecord> {
    vec![
        StoreRecord::new("s1", "Downtown"),
        StoreRecord::new("s2", "Airport"),
    ]
}

pub fn provider_with(products: Vec<ProductRecord>) -> InMemoryCatalogProvider {
    InMemoryCatalogProvider::new()
        .with_products(products)
        .with_categories(categories())
        .with_stores(stores())
}

pub async fn browser_with(products: Vec<ProductRecord>) -> CatalogBrowser {
    CatalogBrowser::builder(provider_with(products))
        .build()
        .await
        .expect("in-memory catalog should load")
}

/// The two-product catalog used by the end-to-end scenario
pub fn scenario_json() -> &'static str {
    r#"{
        "products": [
            {"id": "p1", "name": "Runner", "price": 10, "ratingValue": 4.2, "categoryId": "c1", "featureValue": 1},
            {"id": "p2", "name": "Tote", "price": 30, "ratingValue": 2.0, "categoryId": "c2", "featureValue": 2}
        ],
        "categories": [
            {"id": "c1", "name": "Shoes"},
            {"id": "c2", "name": "Bags"}
        ]
    }"#
}

// ---------------------------------------------------------------------------
// FailingProvider
// ---------------------------------------------------------------------------

/// Provider whose store lookup always fails
pub struct FailingProvider;

#[async_trait]
impl CatalogProvider for FailingProvider {
    async fn get_products(&self) -> Result<Vec<ProductRecord>> {
        Ok(numbered_products(3))
    }

    async fn get_categories(&self) -> Result<Vec<CategoryRecord>> {
        Ok(categories())
    }

    async fn get_stores(&self) -> Result<Vec<StoreRecord>> {
        Err(anyhow!("store service unavailable"))
    }

    async fn get_sort_options(&self) -> Result<IndexMap<String, SortSpec>> {
        Ok(default_sort_options())
    }
}
