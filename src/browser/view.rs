//! Snapshot published to the presentation layer

use crate::core::display::DisplayRecord;
use crate::core::facet::FacetSelection;
use crate::core::page::Pagination;
use serde::Serialize;

/// Everything a product list needs to render one state of the session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserView {
    /// Records of the current page window
    pub records: Vec<DisplayRecord>,

    /// Page numbers and last page of the filtered result
    pub pagination: Pagination,

    pub current_page: usize,

    pub page_size: usize,

    /// Label of the active sort option
    pub sort_label: String,

    /// Facet selection the records were filtered with
    pub selection: FacetSelection,
}

impl BrowserView {
    /// Number of records in the filtered result, across all pages
    pub fn total(&self) -> usize {
        self.pagination.total
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }
}

/// How often each derived stage has been computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub filter_runs: u64,
    pub pagination_runs: u64,
    pub join_runs: u64,
    /// Views published to subscribers
    pub emissions: u64,
}
