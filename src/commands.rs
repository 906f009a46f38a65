use crate::gateway::CategoryGateway;
use crate::models::{CategoryId, SortConfig, SortKey};
use crate::view::{CategoryListView, ViewEvent};
use std::sync::Arc;

pub const FETCH_FAILED: &str = "Failed to fetch categories.";
pub const DELETE_FAILED: &str = "Failed to delete category";
pub const DELETE_MANY_FAILED: &str = "Failed to delete categories";
pub const UNMOUNTED: &str = "Category list has been closed";

/// Async actions of the category list view.
///
/// Each command talks to the gateway and feeds the outcome back into the
/// view as events. Failures come back as the banner text that was shown.
/// Commands borrow `&mut self` across the request, so one list runs its
/// fetches and deletes one at a time.
pub struct CategoryListCommands {
    gateway: Arc<dyn CategoryGateway>,
    view: CategoryListView,
}

impl CategoryListCommands {
    pub fn new(gateway: Arc<dyn CategoryGateway>, sort: SortConfig) -> Self {
        Self {
            gateway,
            view: CategoryListView::new(sort),
        }
    }

    pub fn view(&self) -> &CategoryListView {
        &self.view
    }

    /// Apply a local (non-network) event
    pub fn dispatch(&mut self, event: ViewEvent) -> bool {
        self.view.apply(event)
    }

    pub fn toggle_category(&mut self, id: &str) -> bool {
        self.dispatch(ViewEvent::ToggleExpanded(id.to_string()))
    }

    pub fn toggle_select_category(&mut self, id: &str) -> bool {
        self.dispatch(ViewEvent::ToggleSelected(id.to_string()))
    }

    pub fn select_all(&mut self, checked: bool) -> bool {
        self.dispatch(ViewEvent::SelectAllVisible(checked))
    }

    pub fn search(&mut self, term: &str) -> bool {
        self.dispatch(ViewEvent::SearchChanged(term.to_string()))
    }

    pub fn sort_by(&mut self, key: SortKey) -> bool {
        self.dispatch(ViewEvent::SortClicked(key))
    }

    /// Reload the whole collection. Returns the number of top-level categories.
    pub async fn fetch_categories(&mut self) -> Result<usize, String> {
        if self.view.is_torn_down() {
            return Err(UNMOUNTED.to_string());
        }
        log::info!("Fetching categories");
        self.view.apply(ViewEvent::LoadStarted);

        match self.gateway.list_all().await {
            Ok(categories) => {
                let count = categories.len();
                self.view.apply(ViewEvent::LoadSucceeded(categories));
                Ok(count)
            }
            Err(e) => {
                log::error!("Failed to fetch categories: {}", e);
                let message = e.banner(FETCH_FAILED);
                self.view.apply(ViewEvent::LoadFailed(message.clone()));
                Err(message)
            }
        }
    }

    /// Delete one row, then reload.
    pub async fn delete_category(&mut self, id: &str) -> Result<(), String> {
        if self.view.is_torn_down() {
            return Err(UNMOUNTED.to_string());
        }
        if !self.view.apply(ViewEvent::DeleteStarted(vec![id.to_string()])) {
            return Err(self.refused_delete(id));
        }
        log::info!("Deleting category: {}", id);

        if let Err(e) = self.gateway.delete_one(id).await {
            log::error!("Failed to delete category {}: {}", id, e);
            let message = e.banner(DELETE_FAILED);
            self.view.apply(ViewEvent::DeleteFailed {
                ids: vec![id.to_string()],
                message: message.clone(),
            });
            return Err(message);
        }

        self.view.apply(ViewEvent::RowDeleted(id.to_string()));
        self.reload_after_delete().await;
        Ok(())
    }

    /// Delete every selected row in one request, then reload.
    /// Returns how many identifiers were sent; nothing selected is a no-op.
    pub async fn delete_selected(&mut self) -> Result<usize, String> {
        if self.view.is_torn_down() {
            return Err(UNMOUNTED.to_string());
        }
        let ids: Vec<CategoryId> = self.view.store().selected_ids();
        if ids.is_empty() {
            return Ok(0);
        }
        if !self.view.apply(ViewEvent::DeleteStarted(ids.clone())) {
            let busy = ids.iter().find(|id| self.view.is_pending(id)).cloned().unwrap_or_default();
            return Err(self.refused_delete(&busy));
        }
        log::info!("Deleting {} categories", ids.len());

        if let Err(e) = self.gateway.delete_many(&ids).await {
            log::error!("Failed to delete categories: {}", e);
            let message = e.banner(DELETE_MANY_FAILED);
            self.view.apply(ViewEvent::DeleteFailed {
                ids,
                message: message.clone(),
            });
            return Err(message);
        }

        let count = ids.len();
        self.view.apply(ViewEvent::SelectionDeleted(ids));
        self.reload_after_delete().await;
        Ok(count)
    }

    fn refused_delete(&self, id: &str) -> String {
        if self.view.is_pending(id) {
            format!("Delete of category {} is already in progress", id)
        } else {
            "Categories are still loading".to_string()
        }
    }

    async fn reload_after_delete(&mut self) {
        // A failed reload already put its own message in the banner
        if let Err(e) = self.fetch_categories().await {
            log::warn!("Reload after delete failed: {}", e);
        }
    }

    /// Stop applying results; anything still in flight is discarded
    pub fn unmount(&mut self) {
        self.view.apply(ViewEvent::TornDown);
    }
}
