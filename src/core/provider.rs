//! Read interface to the catalog data source

use crate::core::model::{CategoryRecord, ProductRecord, StoreRecord};
use crate::core::sort::SortSpec;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;

/// Source of the catalog collections a browsing session consumes
///
/// The pipeline treats the provider as a pure, read-only source. It is
/// queried when a session loads and again on explicit reload. How the data is
/// fetched or stored is up to the implementation.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The full product collection
    async fn get_products(&self) -> Result<Vec<ProductRecord>>;

    /// All categories, used for the category facet and the display join
    async fn get_categories(&self) -> Result<Vec<CategoryRecord>>;

    /// All stores, used for the store facet
    async fn get_stores(&self) -> Result<Vec<StoreRecord>>;

    /// Named sort options, in display order
    async fn get_sort_options(&self) -> Result<IndexMap<String, SortSpec>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::default_sort_options;

    struct EmptyProvider;

    #[async_trait]
    impl CatalogProvider for EmptyProvider {
        async fn get_products(&self) -> Result<Vec<ProductRecord>> {
            Ok(Vec::new())
        }

        async fn get_categories(&self) -> Result<Vec<CategoryRecord>> {
            Ok(Vec::new())
        }

        async fn get_stores(&self) -> Result<Vec<StoreRecord>> {
            Ok(Vec::new())
        }

        async fn get_sort_options(&self) -> Result<IndexMap<String, SortSpec>> {
            Ok(default_sort_options())
        }
    }

    #[tokio::test]
    async fn test_provider_is_object_safe() {
        let provider: std::sync::Arc<dyn CatalogProvider> = std::sync::Arc::new(EmptyProvider);
        assert!(provider.get_products().await.unwrap().is_empty());
        assert_eq!(provider.get_sort_options().await.unwrap().len(), 4);
    }
}
