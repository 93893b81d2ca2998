//! Core module containing the catalog types, state stores and pipeline stages

pub mod display;
pub mod error;
pub mod events;
pub mod facet;
pub mod memo;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod provider;
pub mod sort;

pub use display::{CategoryLookup, DisplayRecord, RatingOption, rating_options};
pub use error::{CatalogError, ConfigError};
pub use events::{BrowserEvent, EventBus, EventEnvelope, FacetEvent, ViewEvent};
pub use facet::{FacetSelection, FacetStore, PriceRange, SelectionMap};
pub use model::{CategoryRecord, ProductRecord, StoreRecord};
pub use page::{PageState, Pagination};
pub use provider::CatalogProvider;
pub use sort::{SortField, SortOrder, SortSpec, SortState};
