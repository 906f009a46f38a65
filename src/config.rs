use crate::models::SortConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1/categories";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base of the category endpoints, without trailing slash
    pub api_base_url: String,

    /// Per-request timeout in seconds (None: wait indefinitely)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Sort applied when the list view opens
    #[serde(default)]
    pub default_sort: SortConfig,

    /// Ask before deleting
    #[serde(default = "default_true")]
    pub confirm_deletes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            default_sort: SortConfig::default(),
            confirm_deletes: true,
        }
    }
}

/// JSON-file backed settings with an in-memory copy
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(Mutex::new(AppConfig::default())),
        }
    }

    /// `~/.category-admin/config.json`, or the working directory when no home is set
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".category-admin")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk
    pub async fn load(&self) -> Result<AppConfig> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First run - write defaults
                let default_config = AppConfig::default();
                self.save(&default_config).await?;
                return Ok(default_config);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config {}", self.path.display()))
            }
        };

        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", self.path.display()))?;

        *self.config.lock().await = config.clone();
        Ok(config)
    }

    /// Save settings to disk
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write config {}", self.path.display()))?;

        // Update in-memory config
        *self.config.lock().await = config.clone();

        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Get current config (from memory)
    pub async fn get(&self) -> AppConfig {
        self.config.lock().await.clone()
    }

    pub async fn update_api_base_url(&self, url: String) -> Result<()> {
        let mut config = self.get().await;
        config.api_base_url = url;
        self.save(&config).await
    }

    pub async fn update_default_sort(&self, sort: SortConfig) -> Result<()> {
        let mut config = self.get().await;
        config.default_sort = sort;
        self.save(&config).await
    }

    pub async fn update_request_timeout(&self, secs: Option<u64>) -> Result<()> {
        let mut config = self.get().await;
        config.request_timeout_secs = secs;
        self.save(&config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortKey};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let manager = ConfigManager::new(path.clone());

        let config = manager.load().await.unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.default_sort, SortConfig::default());
        assert!(config.confirm_deletes);

        // Defaults are written on first load
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("nested").join("config.json"));

        let mut config = AppConfig::default();
        config.api_base_url = "http://catalog.internal/api/v1/categories".to_string();
        config.confirm_deletes = false;

        manager.save(&config).await.unwrap();

        let reloaded = ConfigManager::new(manager.path().to_path_buf());
        let loaded = reloaded.load().await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_config_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "http://example.test/api"}"#).unwrap();

        let config = ConfigManager::new(path).load().await.unwrap();
        assert_eq!(config.api_base_url, "http://example.test/api");
        assert!(config.confirm_deletes);
        assert_eq!(config.default_sort, SortConfig::default());
    }

    #[tokio::test]
    async fn test_config_update_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));

        manager.load().await.unwrap();

        manager
            .update_api_base_url("http://other/api".to_string())
            .await
            .unwrap();
        assert_eq!(manager.get().await.api_base_url, "http://other/api");

        let sort = SortConfig::new(SortKey::Name, SortDirection::Ascending);
        manager.update_default_sort(sort).await.unwrap();
        assert_eq!(manager.get().await.default_sort, sort);

        manager.update_request_timeout(Some(30)).await.unwrap();
        assert_eq!(manager.get().await.request_timeout_secs, Some(30));
    }

    #[tokio::test]
    async fn test_config_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(ConfigManager::new(path).load().await.is_err());
    }
}
