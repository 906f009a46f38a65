pub mod commands;
pub mod config;
pub mod editor;
pub mod gateway;
pub mod models;
pub mod projector;
pub mod routes;
pub mod store;
pub mod table;
pub mod view;

use config::AppConfig;
use gateway::{CategoryGateway, GatewayError, HttpGateway};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<dyn CategoryGateway>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self, GatewayError> {
        let gateway = Arc::new(HttpGateway::from_config(&config)?);
        Ok(Self { config, gateway })
    }
}
