use crate::config::AppConfig;
use crate::models::{ApiEnvelope, ApiMessage, Category, CategoryId, CategoryPayload, DeleteManyRequest};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Request never got a response (refused, reset, timed out)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Server responded with status {status}")]
    Server { status: u16, message: Option<String> },

    /// 2xx response whose body was not what the API documents
    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error("Invalid gateway configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// `message` field of a failure body, when the server sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Single line for the error banner.
    ///
    /// Server failures collapse to `fallback`; transport problems keep their
    /// own text so the user can tell the backend is unreachable.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            GatewayError::Server { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

/// Remote operations the category views depend on
#[async_trait]
pub trait CategoryGateway: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Category>, GatewayError>;

    async fn get_one(&self, id: &str) -> Result<Category, GatewayError>;

    async fn create_one(&self, payload: &CategoryPayload) -> Result<(), GatewayError>;

    async fn update_one(&self, id: &str, payload: &CategoryPayload) -> Result<(), GatewayError>;

    async fn delete_one(&self, id: &str) -> Result<(), GatewayError>;

    async fn delete_many(&self, ids: &[CategoryId]) -> Result<(), GatewayError>;
}

/// [`CategoryGateway`] over the `/api/v1/categories` REST endpoints
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `timeout` of `None` leaves requests unbounded
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::Config(format!("base URL must be http(s): {}", base_url)));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.api_base_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into [`GatewayError::Server`]
async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|m| m.message);

    log::warn!("Category API returned {}: {}", status, body);
    Err(GatewayError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CategoryGateway for HttpGateway {
    async fn list_all(&self) -> Result<Vec<Category>, GatewayError> {
        let url = self.url("allCategories");
        log::debug!("GET {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let envelope: ApiEnvelope<Vec<Category>> = response.json().await?;
        let categories = envelope.data.unwrap_or_default();

        log::info!("Fetched {} top-level categories", categories.len());
        Ok(categories)
    }

    async fn get_one(&self, id: &str) -> Result<Category, GatewayError> {
        let url = self.url(&format!("getCategoryById/{}", id));
        log::debug!("GET {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let envelope: ApiEnvelope<Category> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| GatewayError::Decode(format!("no data for category {}", id)))
    }

    async fn create_one(&self, payload: &CategoryPayload) -> Result<(), GatewayError> {
        let url = self.url("createCategory");
        log::debug!("POST {}", url);

        check_status(self.client.post(&url).json(payload).send().await?).await?;
        log::info!("Created category {}", payload.name);
        Ok(())
    }

    async fn update_one(&self, id: &str, payload: &CategoryPayload) -> Result<(), GatewayError> {
        let url = self.url(&format!("updateCategoryById/{}", id));
        log::debug!("PUT {}", url);

        check_status(self.client.put(&url).json(payload).send().await?).await?;
        log::info!("Updated category {}", id);
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.url(&format!("deleteCategoryById/{}", id));
        log::debug!("DELETE {}", url);

        check_status(self.client.delete(&url).send().await?).await?;
        log::info!("Deleted category {}", id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[CategoryId]) -> Result<(), GatewayError> {
        let url = self.url("deleteCategoriesById");
        log::debug!("DELETE {} ({} ids)", url, ids.len());

        let body = DeleteManyRequest {
            category_ids: ids.to_vec(),
        };
        check_status(self.client.delete(&url).json(&body).send().await?).await?;
        log::info!("Deleted {} categories", ids.len());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpGateway::new("localhost:8080/api", None).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_url_joining_trims_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:8080/api/v1/categories/", None).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8080/api/v1/categories");
        assert_eq!(
            gateway.url("allCategories"),
            "http://localhost:8080/api/v1/categories/allCategories"
        );
    }

    #[test]
    fn test_banner_text() {
        let server = GatewayError::Server {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(server.banner("Failed to delete category"), "Failed to delete category");
        assert_eq!(server.server_message(), Some("boom"));

        let network = GatewayError::Network("connection refused".to_string());
        assert_eq!(network.banner("ignored"), "Network error: connection refused");
        assert_eq!(network.server_message(), None);
    }
}
