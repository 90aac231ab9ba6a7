//! Table view state with spreadsheet-like search, filter, sort and paging.
//!
//! Features:
//! - Free-text search across every column
//! - Exact-match dropdown filters (status, customer, unit, parameter)
//! - Click-to-sort headers with direction toggle
//! - Fixed-size pagination (first/prev/next/last)
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut table = TableState::new();
//! table.set_search("boiler");
//! table.sort_by(SortKey::Unit);
//! let page = table.view(&provider.records());
//! render(page.rows, page.total_pages);
//! ```
//!
//! The state is owned by the presentation layer and never persisted. Changing
//! the search term or any filter returns to page 1; sorting and paging leave
//! filters alone.

use crate::query::{self, QueryResult, total_pages};
use crate::types::{FilterField, FilterOptions, SensorRecord, SortConfig, SortKey};

/// Search, filter, sort and page selection for one table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableState {
    /// Free-text search term
    pub search_term: String,
    /// Active exact-match filters
    pub filters: FilterOptions,
    /// Sort column and direction
    pub sort: SortConfig,
    /// Current page (1-indexed, 0 is read as 1)
    current_page: usize,
    /// Id of the row opened in the detail view
    pub selected_row: Option<String>,
}

impl TableState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            ..Default::default()
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page.max(1)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    pub fn set_filter(&mut self, field: FilterField, value: Option<String>) {
        self.filters.set(field, value);
        self.current_page = 1;
    }

    /// Reset every filter and the search term
    pub fn clear_filters(&mut self) {
        self.filters = FilterOptions::default();
        self.search_term.clear();
        self.current_page = 1;
    }

    /// Header click: toggles direction on the sorted column, otherwise sorts
    /// the new column ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page() > 1
    }

    pub fn can_go_next(&self, total_rows: usize) -> bool {
        self.current_page() < total_pages(total_rows)
    }

    pub fn go_first(&mut self) {
        self.current_page = 1;
    }

    pub fn go_prev(&mut self) {
        if self.can_go_prev() {
            self.current_page = self.current_page() - 1;
        }
    }

    pub fn go_next(&mut self, total_rows: usize) {
        if self.can_go_next(total_rows) {
            self.current_page = self.current_page() + 1;
        }
    }

    pub fn go_last(&mut self, total_rows: usize) {
        self.current_page = total_pages(total_rows);
    }

    pub fn select_row(&mut self, id: Option<String>) {
        self.selected_row = id;
    }

    /// The selected record, if it is still present after a refresh
    pub fn selected<'a>(&self, records: &'a [SensorRecord]) -> Option<&'a SensorRecord> {
        let id = self.selected_row.as_deref()?;
        records.iter().find(|r| r.id == id)
    }

    /// Every row matching search and filters, sorted. This is what export
    /// consumes.
    pub fn filtered<'a>(&self, records: &'a [SensorRecord]) -> Vec<&'a SensorRecord> {
        query::filter_and_sort(records, &self.search_term, &self.filters, self.sort)
    }

    /// The current page of the current query
    pub fn view<'a>(&self, records: &'a [SensorRecord]) -> QueryResult<'a> {
        query::query(
            records,
            &self.search_term,
            &self.filters,
            self.sort,
            self.current_page(),
        )
    }
}

/// "Showing X-Y of Z" footer text for a 1-based page
pub fn showing_label(page: usize, total_rows: usize) -> String {
    let range = query::page_range(total_rows, page);
    let start = if range.is_empty() { 0 } else { range.start + 1 };
    format!("Showing {}-{} of {}", start, range.end, total_rows)
}

/// Format row count with thousands suffix (e.g., "1.2K sensors")
pub fn format_row_count(count: usize) -> String {
    let formatted = if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    };

    if count == 1 {
        format!("{} sensor", formatted)
    } else {
        format!("{} sensors", formatted)
    }
}
