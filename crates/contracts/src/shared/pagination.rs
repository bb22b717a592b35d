//! Client-side pagination over a fully fetched result set.
//!
//! Pages are 1-based. The whole collection is kept in memory and every
//! refetch replaces it wholesale; the current page is clamped against the
//! recomputed page count instead of being trusted across reloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rows per page for every approval, dashboard and batch table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `count` rows, never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if count == 0 || page_size == 0 {
        1
    } else {
        (count + page_size - 1) / page_size
    }
}

/// Pager snapshot handed to the table renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// 1-based index of the first row on the page (0 when empty)
    pub first_shown: usize,
    /// 1-based index of the last row on the page (0 when empty)
    pub last_shown: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PagerInfo {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// One page worth of rows plus the pager state that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
    pub rows: &'a [T],
    pub pager: PagerInfo,
}

/// Pagination state for one logical table.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> PageState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the collection and goes back to the first page.
    pub fn load(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 1;
    }

    /// Replaces the collection after a refetch, keeping the current page
    /// when it still exists and falling back to the last page otherwise.
    pub fn reload(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_page();
    }

    /// Moves to page `n`, clipped into `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn go_to_page(&mut self, n: usize) -> usize {
        self.page = n.clamp(1, self.total_pages());
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Applies the retention rule after `removed` rows left the backing
    /// collection server-side (approve/reject). The page only moves when it
    /// would otherwise land beyond the new last page.
    pub fn retain_page_after_removal(&mut self, removed: usize) {
        let remaining = self.items.len().saturating_sub(removed);
        let pages = total_pages(remaining, self.page_size);
        if self.page > pages && self.page > 1 {
            self.page = pages;
        }
    }

    /// Removes the first row matching `pred` locally and re-applies the
    /// retention rule. Returns the removed row.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let idx = self.items.iter().position(pred)?;
        let removed = self.items.remove(idx);
        self.clamp_page();
        Some(removed)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.page_size)
    }

    pub fn pager(&self) -> PagerInfo {
        let total_pages = self.total_pages();
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        let (first_shown, last_shown) = if start < end { (start + 1, end) } else { (0, 0) };
        PagerInfo {
            page: self.page,
            total_pages,
            total_count: self.items.len(),
            first_shown,
            last_shown,
            has_previous: self.page > 1,
            has_next: self.page < total_pages,
        }
    }

    /// Slice for the current page: `items[(page-1)*size .. page*size]`.
    pub fn page_view(&self) -> PageView<'_, T> {
        let start = ((self.page - 1) * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        PageView {
            rows: &self.items[start..end],
            pager: self.pager(),
        }
    }

    fn clamp_page(&mut self) {
        let pages = self.total_pages();
        if self.page > pages {
            self.page = pages;
        }
        if self.page == 0 {
            self.page = 1;
        }
    }
}

/// The tables on the admin approvals screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableId {
    Aggregators,
    Buyers,
    History,
}

impl TableId {
    pub fn all() -> [TableId; 3] {
        [TableId::Aggregators, TableId::Buyers, TableId::History]
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableId::Aggregators => "Pending Aggregators",
            TableId::Buyers => "Pending Buyers",
            TableId::History => "Application History",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            TableId::Aggregators => "No pending aggregator applications",
            TableId::Buyers => "No pending buyer applications",
            TableId::History => "No application history",
        }
    }
}

/// Fetch outcome of a paginated table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub const FAILED_MESSAGE: &'static str = "Error loading data. Please refresh the page.";

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Independent pagination state per table id.
#[derive(Debug, Clone)]
pub struct PaginatedTables<K, T> {
    tables: HashMap<K, PageState<T>>,
    page_size: usize,
}

impl<K: std::hash::Hash + Eq + Copy, T> PaginatedTables<K, T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            tables: HashMap::new(),
            page_size,
        }
    }

    pub fn load(&mut self, id: K, items: Vec<T>) {
        self.table_mut(id).load(items);
    }

    pub fn reload(&mut self, id: K, items: Vec<T>) {
        self.table_mut(id).reload(items);
    }

    pub fn go_to_page(&mut self, id: K, n: usize) -> usize {
        self.table_mut(id).go_to_page(n)
    }

    /// Pager of `id`; a table never loaded reads as one empty page.
    pub fn pager(&self, id: K) -> PagerInfo {
        match self.tables.get(&id) {
            Some(state) => state.pager(),
            None => PageState::<T>::new(self.page_size).pager(),
        }
    }

    /// Rows on the current page of `id`.
    pub fn current_rows(&self, id: K) -> Vec<T>
    where
        T: Clone,
    {
        self.tables
            .get(&id)
            .map(|state| state.page_view().rows.to_vec())
            .unwrap_or_default()
    }

    pub fn count(&self, id: K) -> usize {
        self.tables.get(&id).map(PageState::len).unwrap_or(0)
    }

    pub fn table(&self, id: K) -> Option<&PageState<T>> {
        self.tables.get(&id)
    }

    pub fn table_mut(&mut self, id: K) -> &mut PageState<T> {
        let page_size = self.page_size;
        self.tables
            .entry(id)
            .or_insert_with(|| PageState::new(page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_total_pages_formula() {
        for n in 0..=57 {
            let expected = if n == 0 { 1 } else { (n + 9) / 10 };
            assert_eq!(total_pages(n, 10), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_every_page_slice_matches_items() {
        for n in [0usize, 1, 9, 10, 11, 25, 40] {
            let mut state = PageState::new(10);
            state.load(ids(n));
            for p in 1..=state.total_pages() {
                state.go_to_page(p);
                let start = ((p - 1) * 10).min(n);
                let end = (p * 10).min(n);
                assert_eq!(state.page_view().rows, &ids(n)[start..end]);
            }
        }
    }

    #[test]
    fn test_twenty_five_items_scenario() {
        let mut state = PageState::new(10);
        state.load(ids(25));
        assert_eq!(state.total_pages(), 3);

        let view = state.page_view();
        assert_eq!(view.rows, &ids(10)[..]);
        assert!(!view.pager.has_previous);
        assert!(view.pager.has_next);

        state.go_to_page(2);
        let pager = state.pager();
        assert!(pager.has_previous);
        assert!(pager.has_next);

        state.go_to_page(3);
        let view = state.page_view();
        assert_eq!(view.rows, &[21, 22, 23, 24, 25]);
        assert!(view.pager.has_previous);
        assert!(!view.pager.has_next);
        assert_eq!(view.pager.first_shown, 21);
        assert_eq!(view.pager.last_shown, 25);
        assert_eq!(view.pager.label(), "Page 3 of 3");
    }

    #[test]
    fn test_empty_collection_has_one_disabled_page() {
        let mut state: PageState<usize> = PageState::new(10);
        state.load(Vec::new());
        let view = state.page_view();
        assert!(view.rows.is_empty());
        assert_eq!(view.pager.total_pages, 1);
        assert_eq!(view.pager.page, 1);
        assert!(!view.pager.has_previous);
        assert!(!view.pager.has_next);
        assert_eq!(view.pager.first_shown, 0);
    }

    #[test]
    fn test_go_to_page_is_clipped() {
        let mut state = PageState::new(10);
        state.load(ids(25));
        assert_eq!(state.go_to_page(0), 1);
        assert_eq!(state.go_to_page(99), 3);
        assert_eq!(state.previous_page(), 2);
        assert_eq!(state.next_page(), 3);
        assert_eq!(state.next_page(), 3);
    }

    #[test]
    fn test_load_resets_to_first_page() {
        let mut state = PageState::new(10);
        state.load(ids(25));
        state.go_to_page(3);
        state.load(ids(30));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_removal_on_last_page_lands_on_new_last_page() {
        let mut state = PageState::new(10);
        state.load(ids(21));
        state.go_to_page(3);
        state.retain_page_after_removal(1);
        assert_eq!(state.page(), 2);

        // refetch delivers the shorter collection
        state.reload(ids(20));
        assert_eq!(state.page(), 2);
        assert_eq!(state.page_view().rows.len(), 10);
    }

    #[test]
    fn test_removal_keeps_page_when_it_still_exists() {
        let mut state = PageState::new(10);
        state.load(ids(25));
        state.go_to_page(3);
        state.retain_page_after_removal(1);
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_removal_never_goes_below_first_page() {
        let mut state = PageState::new(10);
        state.load(ids(1));
        state.retain_page_after_removal(1);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_remove_where_clamps() {
        let mut state = PageState::new(10);
        state.load(ids(11));
        state.go_to_page(2);
        assert_eq!(state.remove_where(|id| *id == 11), Some(11));
        assert_eq!(state.page(), 1);
        assert_eq!(state.remove_where(|id| *id == 99), None);
    }

    #[test]
    fn test_tables_are_independent() {
        let mut tables: PaginatedTables<TableId, usize> = PaginatedTables::new(10);
        tables.load(TableId::Aggregators, ids(25));
        tables.load(TableId::Buyers, ids(5));
        tables.go_to_page(TableId::Aggregators, 3);

        assert_eq!(tables.table(TableId::Aggregators).map(|t| t.page()), Some(3));
        assert_eq!(tables.table(TableId::Buyers).map(|t| t.page()), Some(1));
        assert!(tables.table(TableId::History).is_none());
        assert_eq!(tables.current_rows(TableId::Aggregators), vec![21, 22, 23, 24, 25]);
        assert_eq!(tables.count(TableId::Buyers), 5);
    }

    #[test]
    fn test_unloaded_table_reads_as_empty_page() {
        let tables: PaginatedTables<TableId, usize> = PaginatedTables::new(10);
        let pager = tables.pager(TableId::History);
        assert_eq!(pager.total_pages, 1);
        assert!(!pager.has_previous && !pager.has_next);
        assert!(tables.current_rows(TableId::History).is_empty());
    }
}
