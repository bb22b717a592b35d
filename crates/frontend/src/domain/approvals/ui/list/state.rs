use contracts::domain::approvals::ApprovalRow;
use contracts::shared::pagination::{LoadState, PaginatedTables, TableId, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::shared::components::alert::Alert;

/// Everything the approvals screen keeps between renders.
#[derive(Clone, Copy)]
pub struct ApprovalsState {
    pub tables: RwSignal<PaginatedTables<TableId, ApprovalRow>>,
    pub load: RwSignal<HashMap<TableId, LoadState>>,
    /// user ids with an approve/reject call in flight
    pub processing: RwSignal<HashSet<String>>,
    pub alert: RwSignal<Option<Alert>>,
    /// Row whose documents are open in the viewer
    pub viewing: RwSignal<Option<ApprovalRow>>,
}

impl ApprovalsState {
    pub fn new() -> Self {
        Self {
            tables: RwSignal::new(PaginatedTables::new(DEFAULT_PAGE_SIZE)),
            load: RwSignal::new(HashMap::new()),
            processing: RwSignal::new(HashSet::new()),
            alert: RwSignal::new(None),
            viewing: RwSignal::new(None),
        }
    }

    pub fn load_state(&self, table: TableId) -> LoadState {
        self.load
            .with(|l| l.get(&table).cloned().unwrap_or_default())
    }

    pub fn set_load_state(&self, table: TableId, state: LoadState) {
        self.load.update(|l| {
            l.insert(table, state);
        });
    }

    pub fn is_processing(&self, user_id: &str) -> bool {
        self.processing.with(|p| p.contains(user_id))
    }
}

impl Default for ApprovalsState {
    fn default() -> Self {
        Self::new()
    }
}
