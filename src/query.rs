//! Query engine: filter vocabulary, search, filters, sort and pagination.
//!
//! Every function here is pure. Results borrow from the input slice, so the
//! provider's record set is never copied to build a view.

use crate::constants::PAGE_SIZE;
use crate::stage_timer;
use crate::types::{FilterOptions, SensorRecord, SortConfig};
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Range;

// ============================================================================
// Filter Vocabulary
// ============================================================================

/// Columns whose distinct values populate filter dropdowns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DistinctColumn {
    Customer,
    Unit,
    Parameter,
}

impl DistinctColumn {
    fn value(self, record: &SensorRecord) -> &str {
        match self {
            DistinctColumn::Customer => &record.customer_name,
            DistinctColumn::Unit => &record.unit,
            DistinctColumn::Parameter => &record.parameter,
        }
    }
}

/// Non-empty distinct values of `column`, ascending.
pub fn distinct_values(records: &[SensorRecord], column: DistinctColumn) -> Vec<String> {
    records
        .iter()
        .map(|record| column.value(record))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Dropdown options for every filterable column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterVocabulary {
    pub customers: Vec<String>,
    pub units: Vec<String>,
    pub parameters: Vec<String>,
}

impl FilterVocabulary {
    pub fn from_records(records: &[SensorRecord]) -> Self {
        Self {
            customers: distinct_values(records, DistinctColumn::Customer),
            units: distinct_values(records, DistinctColumn::Unit),
            parameters: distinct_values(records, DistinctColumn::Parameter),
        }
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Case-insensitive substring match against every field of the record.
/// An empty term matches everything.
pub fn matches_search(record: &SensorRecord, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    let needle = search_term.to_lowercase();
    matches_lowered(record, &needle)
}

fn matches_lowered(record: &SensorRecord, needle: &str) -> bool {
    needle.is_empty()
        || record
            .text_fields()
            .any(|value| value.to_lowercase().contains(needle))
}

/// Exact, case-sensitive match on every active filter
pub fn matches_filters(record: &SensorRecord, filters: &FilterOptions) -> bool {
    filters
        .active()
        .all(|(field, wanted)| field.record_value(record) == wanted)
}

// ============================================================================
// Filter & Sort
// ============================================================================

/// Stable sort by the configured key. Ties keep their input order in both
/// directions.
pub fn sort_records(rows: &mut [&SensorRecord], sort: SortConfig) {
    rows.sort_by(|a, b| {
        sort.direction
            .apply(a.field(sort.key).cmp(b.field(sort.key)))
    });
}

/// Records matching the search term and all active filters, sorted.
pub fn filter_and_sort<'a>(
    records: &'a [SensorRecord],
    search_term: &str,
    filters: &FilterOptions,
    sort: SortConfig,
) -> Vec<&'a SensorRecord> {
    stage_timer!("filter_and_sort");

    let needle = search_term.to_lowercase();
    let mut rows: Vec<&SensorRecord> = records
        .iter()
        .filter(|record| matches_lowered(record, &needle) && matches_filters(record, filters))
        .collect();
    sort_records(&mut rows, sort);
    rows
}

// ============================================================================
// Pagination
// ============================================================================

/// Page count for `count` rows, never less than one
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Index range of a 1-based page, clamped to `count`. Page 0 is treated as 1.
pub fn page_range(count: usize, page: usize) -> Range<usize> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(PAGE_SIZE).min(count);
    let end = page.saturating_mul(PAGE_SIZE).min(count);
    start..end
}

/// Rows of a 1-based page. Pages past the end are empty.
pub fn paginate<T>(rows: &[T], page: usize) -> &[T] {
    &rows[page_range(rows.len(), page)]
}

/// One page of a query plus the totals the pager needs
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<'a> {
    pub rows: Vec<&'a SensorRecord>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// Filter, sort and slice in one call.
pub fn query<'a>(
    records: &'a [SensorRecord],
    search_term: &str,
    filters: &FilterOptions,
    sort: SortConfig,
    page: usize,
) -> QueryResult<'a> {
    let matched = filter_and_sort(records, search_term, filters, sort);
    let total_count = matched.len();
    let page = page.max(1);
    QueryResult {
        rows: paginate(&matched, page).to_vec(),
        total_count,
        total_pages: total_pages(total_count),
        page,
    }
}
