//! # Catalog Facets
//!
//! A faceted catalog browsing engine: narrow a product collection through
//! independent filter facets, pick a sort order and page through the result
//! in fixed-size windows.
//!
//! ## Features
//!
//! - **Conjunctive Facets**: category, store, price range and rating bucket
//!   filters; an empty facet lets everything through
//! - **Stable Sorting**: named sort options supplied by the catalog provider
//! - **Self-Correcting Pagination**: the current page resets to 1 when the
//!   result shrinks below it
//! - **Display Join**: category names and star-fill vectors, ready to render
//! - **Memoized Recomputation**: only stages whose inputs changed are rerun
//! - **Reactive Output**: views on a `watch` channel, change events on a
//!   broadcast bus
//! - **Configuration-Based**: page sizes and defaults via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_facets::prelude::*;
//!
//! let provider = InMemoryCatalogProvider::new()
//!     .with_products(vec![
//!         ProductRecord::new("p1", "Runner", 10.0, "c1").with_rating(4.2, 12),
//!         ProductRecord::new("p2", "Tote", 30.0, "c2").with_rating(2.0, 3),
//!     ])
//!     .with_categories(vec![
//!         CategoryRecord::new("c1", "Shoes"),
//!         CategoryRecord::new("c2", "Bags"),
//!     ]);
//!
//! let mut browser = CatalogBrowser::builder(provider).build().await?;
//! browser.select_sort("Price: Low to High");
//! browser.toggle_rating(4);
//!
//! let view = browser.view();
//! assert_eq!(view.ids(), vec!["p1"]);
//! assert_eq!(view.records[0].category_name.as_deref(), Some("Shoes"));
//! ```

pub mod browser;
pub mod config;
pub mod core;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Records ===
    pub use crate::core::{
        display::{DisplayRecord, RatingOption, rating_options},
        model::{CategoryRecord, ProductRecord, StoreRecord},
    };

    // === State ===
    pub use crate::core::{
        facet::{FacetSelection, PriceRange},
        page::{PageState, Pagination},
        sort::{SortField, SortOrder, SortSpec, default_sort_options},
    };

    // === Events ===
    pub use crate::core::events::{BrowserEvent, EventBus, EventEnvelope, FacetEvent, ViewEvent};

    // === Errors ===
    pub use crate::core::error::{CatalogError, ConfigError};

    // === Provider ===
    pub use crate::core::provider::CatalogProvider;
    pub use crate::storage::InMemoryCatalogProvider;

    // === Session ===
    pub use crate::browser::{BrowserBuilder, BrowserView, CatalogBrowser, PipelineStats};
    pub use crate::config::BrowserConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use indexmap::IndexMap;
}
