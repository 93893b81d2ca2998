//! Page state and pagination metadata

use serde::{Deserialize, Serialize};

/// Page sizes offered when no configuration overrides them
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [6, 12, 18];

/// Page size used when a session starts
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Page size and current page of a session
///
/// Navigation operations perform no bounds checks. An out-of-range page is
/// corrected by [`PageState::clamp`] the next time the last page is
/// recomputed; until then it simply renders an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Number of records per page (starts at 1)
    pub page_size: usize,

    /// Current page number (starts at 1)
    pub current_page: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn goto_page(&mut self, page: usize) {
        self.current_page = page;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    /// Change the page size, keeping it at least 1
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        let changed = self.page_size != page_size;
        self.page_size = page_size;
        changed
    }

    /// Reset to page 1 when the current page lies outside `1..=last_page`
    ///
    /// Resets to 1 rather than to `last_page`. Returns whether the page
    /// changed.
    pub fn clamp(&mut self, last_page: usize) -> bool {
        if self.current_page == 0 || self.current_page > last_page {
            self.current_page = 1;
            true
        } else {
            false
        }
    }

    /// Half-open index range of the current page window
    ///
    /// Page 0 yields an empty range.
    pub fn window(&self) -> std::ops::Range<usize> {
        match self.current_page.checked_sub(1) {
            Some(index) => {
                let start = index.saturating_mul(self.page_size);
                start..start.saturating_add(self.page_size)
            }
            None => 0..0,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata for a filtered result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page numbers `1..=last_page`
    pub pages: Vec<usize>,

    /// Number of the last page, never below 1
    pub last_page: usize,

    /// Total number of records (after filters)
    pub total: usize,
}

impl Pagination {
    /// Compute pagination for `total` records split into `page_size` pages
    ///
    /// An empty result still has one (empty) page.
    pub fn new(total: usize, page_size: usize) -> Self {
        // Ensure page_size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let last_page = total.div_ceil(page_size).max(1);

        Self {
            pages: (1..=last_page).collect(),
            last_page,
            total,
        }
    }

    pub fn has_next(&self, page: usize) -> bool {
        page < self.last_page
    }

    pub fn has_prev(&self, page: usize) -> bool {
        page > 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}
