use crate::gateway::{CategoryGateway, GatewayError};
use crate::models::{Category, CategoryId, CategoryPayload, CategoryStatus};
use crate::routes::Route;
use std::sync::Arc;
use thiserror::Error;

pub const LOAD_FAILED: &str = "Failed to fetch category";
pub const UPDATE_FAILED: &str = "Failed to update category";
pub const CREATE_FAILED: &str = "Failed to create category";

#[derive(Debug, Clone, Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Gateway {
        message: String,
        #[source]
        source: GatewayError,
    },
}

/// Field values bound to the form inputs
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    /// Empty means "No Parent"
    pub parent_id: String,
    pub status: CategoryStatus,
    pub stock_availability: bool,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            parent_id: String::new(),
            status: CategoryStatus::Active,
            stock_availability: true,
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name().to_string(),
            description: category.description().to_string(),
            parent_id: category.parent_id.clone().unwrap_or_default(),
            status: category.status.unwrap_or_default(),
            stock_availability: category.stock_availability.unwrap_or(false),
        }
    }
}

impl CategoryForm {
    /// Required-field check
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Validation("Category name is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(FormError::Validation("Description is required".to_string()));
        }
        Ok(())
    }

    /// Request body for create/update. A blank parent is left out entirely.
    pub fn to_payload(&self) -> Result<CategoryPayload, FormError> {
        self.validate()?;

        let parent = self.parent_id.trim();
        Ok(CategoryPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            stock_availability: self.stock_availability,
            parent_id: if parent.is_empty() {
                None
            } else {
                Some(parent.to_string())
            },
        })
    }
}

/// Entry in the parent picker
#[derive(Debug, Clone, PartialEq)]
pub struct ParentOption {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(CategoryId),
}

/// Add or edit form for a single category
pub struct CategoryEditor {
    gateway: Arc<dyn CategoryGateway>,
    mode: EditorMode,
    pub form: CategoryForm,
    parent_options: Vec<ParentOption>,
    error: Option<String>,
    loading: bool,
}

impl CategoryEditor {
    pub fn create(gateway: Arc<dyn CategoryGateway>) -> Self {
        Self {
            gateway,
            mode: EditorMode::Create,
            form: CategoryForm::default(),
            parent_options: Vec::new(),
            error: None,
            loading: false,
        }
    }

    pub fn edit(gateway: Arc<dyn CategoryGateway>, id: impl Into<CategoryId>) -> Self {
        Self {
            mode: EditorMode::Edit(id.into()),
            ..Self::create(gateway)
        }
    }

    /// Fill the form and the parent picker.
    ///
    /// Returns `Some(Route::List)` when the category could not be loaded and
    /// the caller should navigate back.
    pub async fn open(&mut self) -> Option<Route> {
        self.load_parent_options().await;

        let id = match &self.mode {
            EditorMode::Create => return None,
            EditorMode::Edit(id) => id.clone(),
        };

        self.loading = true;
        let result = self.gateway.get_one(&id).await;
        self.loading = false;

        match result {
            Ok(category) => {
                self.form = CategoryForm::from(&category);
                None
            }
            Err(e) => {
                log::error!("Failed to load category {}: {}", id, e);
                self.error = Some(e.banner(LOAD_FAILED));
                Some(Route::List)
            }
        }
    }

    /// Top-level categories other than the one being edited. Failure only logs.
    async fn load_parent_options(&mut self) {
        let own_id = match &self.mode {
            EditorMode::Edit(id) => Some(id.as_str()),
            EditorMode::Create => None,
        };

        match self.gateway.list_all().await {
            Ok(categories) => {
                self.parent_options = categories
                    .into_iter()
                    .filter(|c| Some(c.id.as_str()) != own_id)
                    .map(|c| ParentOption { id: c.id, name: c.name.unwrap_or_default() })
                    .collect();
            }
            Err(e) => log::error!("Error fetching categories: {}", e),
        }
    }

    /// Validate and send the form. On success the caller should go to the returned route.
    pub async fn submit(&mut self) -> Result<Route, FormError> {
        self.error = None;

        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.loading = true;
        let (result, fallback) = match &self.mode {
            EditorMode::Create => (self.gateway.create_one(&payload).await, CREATE_FAILED),
            EditorMode::Edit(id) => (self.gateway.update_one(id, &payload).await, UPDATE_FAILED),
        };
        self.loading = false;

        match result {
            Ok(()) => Ok(Route::List),
            Err(source) => {
                let message = match &source {
                    GatewayError::Server { .. } => source.server_message().unwrap_or(fallback).to_string(),
                    other => other.to_string(),
                };
                log::error!("{}: {}", fallback, source);
                self.error = Some(message.clone());
                Err(FormError::Gateway { message, source })
            }
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn parent_options(&self) -> &[ParentOption] {
        &self.parent_options
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
