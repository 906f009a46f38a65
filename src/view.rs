use crate::models::{Category, CategoryId, CategoryStatus, SortConfig, SortKey};
use crate::projector;
use crate::store::ViewStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Fetch-all lifecycle. Success and failure are instantaneous and land back on `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    LoadStarted,
    LoadSucceeded(Vec<Category>),
    LoadFailed(String),
    ToggleExpanded(CategoryId),
    ToggleSelected(CategoryId),
    /// Header checkbox: true selects the visible rows, false clears
    SelectAllVisible(bool),
    SearchChanged(String),
    SortClicked(SortKey),
    DeleteStarted(Vec<CategoryId>),
    /// One row removed through its own delete action
    RowDeleted(CategoryId),
    /// The selection was removed through the bulk action
    SelectionDeleted(Vec<CategoryId>),
    DeleteFailed { ids: Vec<CategoryId>, message: String },
    ErrorDismissed,
    TornDown,
}

/// One line of the rendered table
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub depth: usize,
    pub name: String,
    pub description: String,
    pub status: Option<CategoryStatus>,
    pub stock_label: &'static str,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
    /// Only top-level rows carry a usable checkbox
    pub selectable: bool,
    /// A delete for this row was dispatched and has not completed
    pub pending_delete: bool,
}

/// State of the category list view.
///
/// Every change goes through [`CategoryListView::apply`]; the async commands
/// in [`crate::commands`] only translate gateway results into events.
#[derive(Debug, Clone)]
pub struct CategoryListView {
    categories: Vec<Category>,
    search_term: String,
    sort: SortConfig,
    store: ViewStore,
    fetch: FetchState,
    error: Option<String>,
    pending_deletes: HashSet<CategoryId>,
    last_synced: Option<DateTime<Utc>>,
    torn_down: bool,
}

impl Default for CategoryListView {
    fn default() -> Self {
        Self::new(SortConfig::default())
    }
}

impl CategoryListView {
    pub fn new(sort: SortConfig) -> Self {
        Self {
            categories: Vec::new(),
            search_term: String::new(),
            sort,
            store: ViewStore::new(),
            fetch: FetchState::Idle,
            error: None,
            pending_deletes: HashSet::new(),
            last_synced: None,
            torn_down: false,
        }
    }

    /// Advance the view by one event.
    ///
    /// Returns false when the event was dropped: after teardown, while a
    /// fetch is running (for table controls), or when it targets a row the
    /// action does not apply to.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        if self.torn_down {
            log::debug!("View torn down, dropping {:?}", event_name(&event));
            return false;
        }

        match event {
            ViewEvent::LoadStarted => {
                self.fetch = FetchState::Loading;
                self.error = None;
                log::debug!("Fetch: Idle -> Loading");
            }
            ViewEvent::LoadSucceeded(categories) => {
                self.categories = categories;
                self.fetch = FetchState::Idle;
                self.last_synced = Some(Utc::now());
                self.expand_matching_parents();
                log::debug!("Fetch: Loading -> Success -> Idle ({} categories)", self.categories.len());
            }
            ViewEvent::LoadFailed(message) => {
                self.fetch = FetchState::Idle;
                log::debug!("Fetch: Loading -> Failed -> Idle ({})", message);
                self.error = Some(message);
            }
            ViewEvent::ToggleExpanded(id) => {
                self.store.toggle_expanded(&id);
            }
            ViewEvent::ToggleSelected(id) => {
                if self.is_loading() {
                    return false;
                }
                if !self.visible_ids().contains(&id) {
                    log::debug!("Ignoring selection of non top-level row {}", id);
                    return false;
                }
                self.store.toggle_selected(&id);
            }
            ViewEvent::SelectAllVisible(checked) => {
                if self.is_loading() {
                    return false;
                }
                if checked {
                    let ids = self.visible_ids();
                    self.store.select_all(ids);
                } else {
                    self.store.clear_selection();
                }
            }
            ViewEvent::SearchChanged(term) => {
                self.search_term = term;
                self.expand_matching_parents();
            }
            ViewEvent::SortClicked(key) => {
                if self.is_loading() {
                    return false;
                }
                self.sort = self.sort.clicked(key);
                log::debug!("Sorting by {} {:?}", self.sort.key, self.sort.direction);
            }
            ViewEvent::DeleteStarted(ids) => {
                if self.is_loading() {
                    return false;
                }
                if let Some(busy) = ids.iter().find(|id| self.pending_deletes.contains(*id)) {
                    log::warn!("Delete of {} already in flight", busy);
                    return false;
                }
                self.pending_deletes.extend(ids);
            }
            ViewEvent::RowDeleted(id) => {
                self.pending_deletes.remove(&id);
                self.store.deselect(std::slice::from_ref(&id));
            }
            ViewEvent::SelectionDeleted(ids) => {
                for id in &ids {
                    self.pending_deletes.remove(id);
                }
                self.store.clear_selection();
            }
            ViewEvent::DeleteFailed { ids, message } => {
                for id in &ids {
                    self.pending_deletes.remove(id);
                }
                self.error = Some(message);
            }
            ViewEvent::ErrorDismissed => {
                self.error = None;
            }
            ViewEvent::TornDown => {
                self.torn_down = true;
            }
        }
        true
    }

    /// Auto-expand rule: open every parent whose direct child matches the
    /// current term. Never closes rows.
    fn expand_matching_parents(&mut self) {
        let parents = projector::matching_parents(&self.categories, &self.search_term);
        if self.store.expand_all(parents) {
            log::debug!("Search '{}' opened matching parents", self.search_term);
        }
    }

    /// Filtered and sorted top-level categories
    pub fn visible(&self) -> Vec<&Category> {
        projector::project(&self.categories, &self.search_term, &self.sort)
    }

    pub fn visible_ids(&self) -> Vec<CategoryId> {
        self.visible().into_iter().map(|c| c.id.clone()).collect()
    }

    /// Table rows: visible categories with the children of open rows
    /// inlined below them, recursively.
    pub fn rows(&self) -> Vec<CategoryRow> {
        let mut rows = Vec::new();
        for category in self.visible() {
            self.push_rows(category, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, category: &Category, depth: usize, rows: &mut Vec<CategoryRow>) {
        let expanded = self.store.is_expanded(&category.id);
        rows.push(CategoryRow {
            id: category.id.clone(),
            depth,
            name: category.name().to_string(),
            description: category.description().to_string(),
            status: category.status,
            stock_label: category.stock_label(),
            has_children: category.has_children(),
            expanded,
            selected: depth == 0 && self.store.is_selected(&category.id),
            selectable: depth == 0,
            pending_delete: self.pending_deletes.contains(&category.id),
        });

        if expanded {
            for child in &category.children {
                self.push_rows(child, depth + 1, rows);
            }
        }
    }

    /// State of the header checkbox
    pub fn all_visible_selected(&self) -> bool {
        let visible = self.visible().len();
        visible > 0 && self.store.selection_count() == visible
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn total_count(&self) -> usize {
        self.categories.len()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn store(&self) -> &ViewStore {
        &self.store
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch
    }

    pub fn is_loading(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending_deletes.contains(id)
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

fn event_name(event: &ViewEvent) -> &'static str {
    match event {
        ViewEvent::LoadStarted => "LoadStarted",
        ViewEvent::LoadSucceeded(_) => "LoadSucceeded",
        ViewEvent::LoadFailed(_) => "LoadFailed",
        ViewEvent::ToggleExpanded(_) => "ToggleExpanded",
        ViewEvent::ToggleSelected(_) => "ToggleSelected",
        ViewEvent::SelectAllVisible(_) => "SelectAllVisible",
        ViewEvent::SearchChanged(_) => "SearchChanged",
        ViewEvent::SortClicked(_) => "SortClicked",
        ViewEvent::DeleteStarted(_) => "DeleteStarted",
        ViewEvent::RowDeleted(_) => "RowDeleted",
        ViewEvent::SelectionDeleted(_) => "SelectionDeleted",
        ViewEvent::DeleteFailed { .. } => "DeleteFailed",
        ViewEvent::ErrorDismissed => "ErrorDismissed",
        ViewEvent::TornDown => "TornDown",
    }
}
