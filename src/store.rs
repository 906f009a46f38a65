use crate::models::CategoryId;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared, immutable snapshot of one identifier set.
pub type IdSet = Arc<HashSet<CategoryId>>;

/// Expansion and selection state of the category table.
///
/// Writes never touch a published set: each one builds a fresh set and swaps
/// it in. A snapshot handed out by [`ViewStore::expanded`] or
/// [`ViewStore::selected`] therefore stays valid, and `Arc::ptr_eq` against a
/// newer snapshot tells whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct ViewStore {
    expanded: IdSet,
    selected: IdSet,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a closed row or close an open one
    pub fn toggle_expanded(&mut self, id: &str) {
        self.expanded = Arc::new(toggled(&self.expanded, id));
    }

    /// Open every row in `ids`. Never closes anything.
    ///
    /// Returns false and keeps the current snapshot when all of them were
    /// already open.
    pub fn expand_all<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = CategoryId>,
    {
        let additions: Vec<CategoryId> = ids
            .into_iter()
            .filter(|id| !self.expanded.contains(id))
            .collect();
        if additions.is_empty() {
            return false;
        }

        let mut next = HashSet::with_capacity(self.expanded.len() + additions.len());
        next.extend(self.expanded.iter().cloned());
        next.extend(additions);
        self.expanded = Arc::new(next);
        true
    }

    /// Check or uncheck one row
    pub fn toggle_selected(&mut self, id: &str) {
        self.selected = Arc::new(toggled(&self.selected, id));
    }

    /// Replace the selection with exactly `ids`
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = CategoryId>,
    {
        self.selected = Arc::new(ids.into_iter().collect());
    }

    pub fn clear_selection(&mut self) {
        self.selected = Arc::new(HashSet::new());
    }

    /// Drop `ids` from the selection, leaving other entries checked
    pub fn deselect(&mut self, ids: &[CategoryId]) {
        if !ids.iter().any(|id| self.selected.contains(id)) {
            return;
        }
        let next = self
            .selected
            .iter()
            .filter(|id| !ids.contains(id))
            .cloned()
            .collect();
        self.selected = Arc::new(next);
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    pub fn expanded(&self) -> IdSet {
        Arc::clone(&self.expanded)
    }

    pub fn selected(&self) -> IdSet {
        Arc::clone(&self.selected)
    }

    /// Selected identifiers in a stable order, for request bodies and prompts
    pub fn selected_ids(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }
}

fn toggled(set: &HashSet<CategoryId>, id: &str) -> HashSet<CategoryId> {
    let mut next = set.clone();
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}
