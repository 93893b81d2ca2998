//! In-memory implementation of CatalogProvider for testing and development

use crate::core::CatalogProvider;
use crate::core::model::{CategoryRecord, ProductRecord, StoreRecord};
use crate::core::sort::{SortSpec, default_sort_options};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogData {
    #[serde(default)]
    products: Vec<ProductRecord>,
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    stores: Vec<StoreRecord>,
    #[serde(default = "default_sort_options")]
    sort_options: IndexMap<String, SortSpec>,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            stores: Vec::new(),
            sort_options: default_sort_options(),
        }
    }
}

/// In-memory catalog provider
///
/// Useful for testing and development. Uses RwLock for thread-safe access,
/// so the data can be replaced while sessions hold a handle to the provider.
#[derive(Clone, Default)]
pub struct InMemoryCatalogProvider {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryCatalogProvider {
    /// Create an empty provider offering the default sort options
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON document
    ///
    /// # Format
    /// ```json
    /// {
    ///   "products": [{"id": "p1", "name": "Runner", "price": 10, "categoryId": "c1"}],
    ///   "categories": [{"id": "c1", "name": "Shoes"}],
    ///   "stores": [{"id": "s1", "name": "Downtown"}],
    ///   "sortOptions": {"Featured": {"sortBy": "featureValue", "order": "desc"}}
    /// }
    /// ```
    ///
    /// Omitted collections are empty; omitted sort options fall back to the
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
        })
    }

    pub fn with_products(self, products: Vec<ProductRecord>) -> Self {
        self.update(|data| data.products = products);
        self
    }

    pub fn with_categories(self, categories: Vec<CategoryRecord>) -> Self {
        self.update(|data| data.categories = categories);
        self
    }

    pub fn with_stores(self, stores: Vec<StoreRecord>) -> Self {
        self.update(|data| data.stores = stores);
        self
    }

    pub fn with_sort_options(self, sort_options: IndexMap<String, SortSpec>) -> Self {
        self.update(|data| data.sort_options = sort_options);
        self
    }

    /// Replace the product collection
    pub fn set_products(&self, products: Vec<ProductRecord>) {
        self.update(|data| data.products = products);
    }

    /// Replace the category collection
    pub fn set_categories(&self, categories: Vec<CategoryRecord>) {
        self.update(|data| data.categories = categories);
    }

    /// Replace the store collection
    pub fn set_stores(&self, stores: Vec<StoreRecord>) {
        self.update(|data| data.stores = stores);
    }

    fn update(&self, apply: impl FnOnce(&mut CatalogData)) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        apply(&mut data);
    }

    fn read<T>(&self, view: impl FnOnce(&CatalogData) -> T) -> Result<T> {
        let data = self
            .data
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(view(&data))
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalogProvider {
    async fn get_products(&self) -> Result<Vec<ProductRecord>> {
        self.read(|data| data.products.clone())
    }

    async fn get_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.read(|data| data.categories.clone())
    }

    async fn get_stores(&self) -> Result<Vec<StoreRecord>> {
        self.read(|data| data.stores.clone())
    }

    async fn get_sort_options(&self) -> Result<IndexMap<String, SortSpec>> {
        self.read(|data| data.sort_options.clone())
    }
}
