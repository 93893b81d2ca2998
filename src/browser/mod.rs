//! Browsing session
//!
//! [`CatalogBrowser`] owns the facet, sort and page state of one session and
//! wires them to the derived pipeline:
//!
//! ```text
//! provider ─▶ filter + sort ─▶ pagination (+ clamp) ─▶ display join ─▶ page window
//!               ▲     ▲             ▲                      ▲              ▲
//!            facets  sort        page size             categories     current page
//! ```
//!
//! Every mutation synchronously runs one refresh pass. Each stage is memoized
//! on the revisions of its inputs, so a page change re-slices the window
//! without refiltering, and a sort change re-sorts without touching the
//! category join inputs. The latest [`BrowserView`] is held in a
//! `tokio::sync::watch` channel: a subscriber attaching mid-session sees it
//! immediately, without forcing a recomputation.

mod builder;
mod view;

pub use builder::BrowserBuilder;
pub use view::{BrowserView, PipelineStats};

use crate::config::BrowserConfig;
use crate::core::display::{
    CategoryLookup, DisplayRecord, RatingOption, join_display, page_window,
    rating_threshold_options,
};
use crate::core::error::{CatalogError, Result};
use crate::core::events::{EventBus, EventEnvelope, ViewEvent};
use crate::core::facet::{FacetStore, PriceRange};
use crate::core::memo::Memo;
use crate::core::model::{CategoryRecord, ProductRecord, StoreRecord};
use crate::core::page::{PageState, Pagination};
use crate::core::pipeline::filter_and_sort;
use crate::core::provider::CatalogProvider;
use crate::core::sort::{SortSpec, SortState};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;

/// (catalog revision, facet revision, sort revision)
type FilterKey = (u64, u64, u64);

/// One user's browsing session over a catalog
pub struct CatalogBrowser {
    provider: Arc<dyn CatalogProvider>,
    config: BrowserConfig,
    bus: EventBus,

    products: Arc<Vec<ProductRecord>>,
    catalog_revision: u64,
    categories: Vec<CategoryRecord>,
    lookup: CategoryLookup,
    category_revision: u64,
    stores: Vec<StoreRecord>,

    facets: FacetStore,
    sort: SortState,
    sort_revision: u64,
    page: PageState,

    filtered: Memo<FilterKey, Arc<Vec<ProductRecord>>>,
    pagination: Memo<(u64, usize), Pagination>,
    joined: Memo<(u64, u64), Arc<Vec<DisplayRecord>>>,

    view: watch::Sender<Arc<BrowserView>>,
    emissions: u64,
    batch_depth: usize,
    pending_emit: bool,
}

impl CatalogBrowser {
    /// Start building a session over `provider`
    pub fn builder(provider: impl CatalogProvider + 'static) -> BrowserBuilder {
        BrowserBuilder::new(provider)
    }

    /// Create a session with empty catalog data
    ///
    /// Call [`CatalogBrowser::load`] to fetch the provider's collections.
    pub(crate) fn new(
        provider: Arc<dyn CatalogProvider>,
        config: BrowserConfig,
        bus: EventBus,
    ) -> Self {
        let sort = SortState::new(IndexMap::new(), &config.default_sort_label);
        let page = PageState::new(config.default_page_size);
        let (view, _) = watch::channel(Arc::new(BrowserView::default()));

        let mut browser = Self {
            provider,
            config,
            facets: FacetStore::new(bus.clone()),
            bus,
            products: Arc::new(Vec::new()),
            catalog_revision: 0,
            categories: Vec::new(),
            lookup: CategoryLookup::default(),
            category_revision: 0,
            stores: Vec::new(),
            sort,
            sort_revision: 0,
            page,
            filtered: Memo::new(),
            pagination: Memo::new(),
            joined: Memo::new(),
            view,
            emissions: 0,
            batch_depth: 0,
            pending_emit: false,
        };
        browser.refresh();
        browser
    }

    /// Fetch every provider collection and recompute the view
    ///
    /// Can be called again to reload; facet slots for ids already known are
    /// kept along with their selection.
    pub async fn load(&mut self) -> Result<()> {
        let provider = Arc::clone(&self.provider);
        let (products, categories, stores, sort_options) = futures::try_join!(
            async {
                provider
                    .get_products()
                    .await
                    .map_err(|e| CatalogError::provider("products", e))
            },
            async {
                provider
                    .get_categories()
                    .await
                    .map_err(|e| CatalogError::provider("categories", e))
            },
            async {
                provider
                    .get_stores()
                    .await
                    .map_err(|e| CatalogError::provider("stores", e))
            },
            async {
                provider
                    .get_sort_options()
                    .await
                    .map_err(|e| CatalogError::provider("sort options", e))
            },
        )?;

        self.apply_catalog(products, categories, stores, sort_options);
        Ok(())
    }

    /// Alias of [`CatalogBrowser::load`] for an already loaded session
    pub async fn reload(&mut self) -> Result<()> {
        self.load().await
    }

    fn apply_catalog(
        &mut self,
        products: Vec<ProductRecord>,
        categories: Vec<CategoryRecord>,
        stores: Vec<StoreRecord>,
        sort_options: IndexMap<String, SortSpec>,
    ) {
        let new_categories = self
            .facets
            .register_categories(categories.iter().map(|c| c.id.clone()));
        let new_stores = self
            .facets
            .register_stores(stores.iter().map(|s| s.id.clone()));

        let counts = (products.len(), categories.len(), stores.len());
        tracing::info!(
            products = counts.0,
            categories = counts.1,
            stores = counts.2,
            new_categories,
            new_stores,
            "catalog loaded"
        );

        self.products = Arc::new(products);
        self.catalog_revision += 1;
        self.lookup = CategoryLookup::new(&categories);
        self.categories = categories;
        self.category_revision += 1;
        self.stores = stores;
        self.sort
            .replace_options(sort_options, &self.config.default_sort_label);
        self.sort_revision += 1;

        self.bus.publish(ViewEvent::CatalogLoaded {
            products: counts.0,
            categories: counts.1,
            stores: counts.2,
        });
        self.refresh();
    }

    // =========================================================================
    // Facet mutations
    // =========================================================================

    pub fn toggle_category(&mut self, id: &str) -> bool {
        let changed = self.facets.toggle_category(id);
        self.refresh_if(changed)
    }

    pub fn set_category(&mut self, id: &str, selected: bool) -> bool {
        let changed = self.facets.set_category(id, selected);
        self.refresh_if(changed)
    }

    pub fn toggle_store(&mut self, id: &str) -> bool {
        let changed = self.facets.toggle_store(id);
        self.refresh_if(changed)
    }

    pub fn set_store(&mut self, id: &str, selected: bool) -> bool {
        let changed = self.facets.set_store(id, selected);
        self.refresh_if(changed)
    }

    pub fn set_price_range(&mut self, range: PriceRange) -> bool {
        let changed = self.facets.set_price_range(range);
        self.refresh_if(changed)
    }

    pub fn set_price_from(&mut self, from: f64) -> bool {
        let changed = self.facets.set_price_from(from);
        self.refresh_if(changed)
    }

    pub fn set_price_to(&mut self, to: f64) -> bool {
        let changed = self.facets.set_price_to(to);
        self.refresh_if(changed)
    }

    pub fn toggle_rating(&mut self, bucket: u8) -> bool {
        let changed = self.facets.toggle_rating(bucket);
        self.refresh_if(changed)
    }

    pub fn set_rating(&mut self, bucket: u8, selected: bool) -> bool {
        let changed = self.facets.set_rating(bucket, selected);
        self.refresh_if(changed)
    }

    /// Reset every facet to pass-through
    pub fn clear_facets(&mut self) -> bool {
        let changed = self.facets.clear();
        self.refresh_if(changed)
    }

    // =========================================================================
    // Sort and page mutations
    // =========================================================================

    /// Activate the sort option named `label`
    pub fn select_sort(&mut self, label: &str) -> bool {
        if !self.sort.select(label) {
            return false;
        }
        self.sort_revision += 1;
        self.bus.publish(ViewEvent::SortChanged {
            label: label.to_string(),
            spec: self.sort.spec(),
        });
        self.refresh();
        true
    }

    /// Change the page size to one of the configured options
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !self.config.is_page_size_offered(page_size) {
            tracing::warn!(
                page_size,
                options = ?self.config.page_size_options,
                "ignoring page size that is not offered"
            );
            return false;
        }
        if !self.page.set_page_size(page_size) {
            return false;
        }
        self.bus.publish(ViewEvent::PageSizeChanged { page_size });
        self.refresh();
        true
    }

    /// Jump to page `page`
    ///
    /// Not bounds-checked: an out-of-range page shows an empty window until
    /// the next filter or page size change resets it.
    pub fn goto_page(&mut self, page: usize) {
        self.navigate(|state| state.goto_page(page));
    }

    pub fn next_page(&mut self) {
        self.navigate(PageState::next_page);
    }

    pub fn previous_page(&mut self) {
        self.navigate(PageState::previous_page);
    }

    fn navigate(&mut self, apply: impl FnOnce(&mut PageState)) {
        apply(&mut self.page);
        let page = self.page.current_page;
        tracing::debug!(page, "page navigation");
        self.bus.publish(ViewEvent::PageChanged { page });
        self.refresh();
    }

    /// Run several mutations, publishing a single view at the end
    ///
    /// Derived state is still recomputed after each mutation, so the final
    /// view is identical to applying the mutations one by one.
    pub fn batch<R>(&mut self, mutate: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let out = mutate(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && std::mem::take(&mut self.pending_emit) {
            self.emit();
        }
        out
    }

    // =========================================================================
    // Refresh pass
    // =========================================================================

    fn refresh_if(&mut self, changed: bool) -> bool {
        if changed {
            self.refresh();
        }
        changed
    }

    fn refresh(&mut self) {
        self.recompute();
        if self.batch_depth > 0 {
            self.pending_emit = true;
        } else {
            self.emit();
        }
    }

    /// Bring every memoized stage up to date, in dependency order
    fn recompute(&mut self) {
        let key = (
            self.catalog_revision,
            self.facets.revision(),
            self.sort_revision,
        );
        let products = &self.products;
        let facets = &self.facets;
        let spec = self.sort.spec();
        let (filtered, refiltered) = self.filtered.get_or_compute(key, || {
            Arc::new(filter_and_sort(products, &facets.selection(), &spec))
        });
        let filtered = Arc::clone(filtered);
        let filtered_revision = self.filtered.computations();
        if refiltered {
            tracing::debug!(
                total = filtered.len(),
                catalog = self.products.len(),
                ?spec,
                "filtered result recomputed"
            );
        }

        let page_size = self.page.page_size;
        let (pagination, repaginated) = self
            .pagination
            .get_or_compute((filtered_revision, page_size), || {
                Pagination::new(filtered.len(), page_size)
            });
        let last_page = pagination.last_page;
        if repaginated {
            let from = self.page.current_page;
            if self.page.clamp(last_page) {
                tracing::debug!(from, last_page, "current page out of range, reset to 1");
                self.bus.publish(ViewEvent::PageReset { from, last_page });
            }
        }

        let lookup = &self.lookup;
        let (_, rejoined) = self
            .joined
            .get_or_compute((filtered_revision, self.category_revision), || {
                Arc::new(join_display(&filtered, lookup))
            });
        if rejoined {
            tracing::debug!(records = filtered.len(), "display records joined");
        }
    }

    fn emit(&mut self) {
        let records = self
            .joined
            .cached()
            .map(|joined| page_window(joined.as_slice(), &self.page))
            .unwrap_or_default();
        let view = BrowserView {
            records,
            pagination: self.pagination.cached().cloned().unwrap_or_default(),
            current_page: self.page.current_page,
            page_size: self.page.page_size,
            sort_label: self.sort.active_label().to_string(),
            selection: self.facets.selection(),
        };

        let published = self.view.send_if_modified(|current| {
            if **current == view {
                false
            } else {
                *current = Arc::new(view);
                true
            }
        });
        if published {
            self.emissions += 1;
            tracing::debug!(emissions = self.emissions, "view published");
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The most recently computed view
    pub fn view(&self) -> Arc<BrowserView> {
        self.view.borrow().clone()
    }

    /// Watch the view; the receiver starts at the current value
    pub fn subscribe(&self) -> watch::Receiver<Arc<BrowserView>> {
        self.view.subscribe()
    }

    /// The view as a stream, yielding the current value first
    pub fn view_stream(&self) -> WatchStream<Arc<BrowserView>> {
        WatchStream::new(self.view.subscribe())
    }

    /// Subscribe to facet and view change events
    pub fn events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.bus.subscribe()
    }

    /// Filtered and sorted products across all pages
    pub fn filtered(&self) -> Arc<Vec<ProductRecord>> {
        self.filtered.cached().cloned().unwrap_or_default()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination.cached().cloned().unwrap_or_default()
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn facets(&self) -> &FacetStore {
        &self.facets
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    pub fn sort_options(&self) -> &IndexMap<String, SortSpec> {
        self.sort.options()
    }

    pub fn active_sort(&self) -> &str {
        self.sort.active_label()
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.config.page_size_options
    }

    /// Rating filter options with their star vectors
    pub fn rating_options(&self) -> Vec<RatingOption> {
        rating_threshold_options()
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            filter_runs: self.filtered.computations(),
            pagination_runs: self.pagination.computations(),
            join_runs: self.joined.computations(),
            emissions: self.emissions,
        }
    }
}

impl std::fmt::Debug for CatalogBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBrowser")
            .field("products", &self.products.len())
            .field("categories", &self.categories.len())
            .field("stores", &self.stores.len())
            .field("sort", &self.sort.active_label())
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}
