use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::DashboardError;

use super::{paths, Config};

pub const BASE_URL_ENV: &str = "DASHBOARD_BASE_URL";
pub const PAGE_ORIGIN_ENV: &str = "DASHBOARD_PAGE_ORIGIN";

impl Config {
    /// Load configuration from config.json next to the app directory.
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = paths::get_config_path();
        let mut config = match Self::load_from(&config_path).await {
            Ok(config) => config,
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        info!(
            base_url = %config.base_url,
            page_origin = ?config.page_origin,
            "Loaded configuration"
        );
        config
    }

    /// Read a config file, returning defaults when it does not exist.
    pub async fn load_from(config_path: &Path) -> Result<Self, DashboardError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| DashboardError::Config(format!("Failed to read config file: {err}")))?;

        let mut config: Config = serde_json::from_str(&contents)
            .map_err(|err| DashboardError::Config(format!("Failed to parse config.json: {err}")))?;

        config.request_timeout_secs = config.request_timeout_secs.max(1);
        config.handshake_timeout_secs = config.handshake_timeout_secs.max(1);
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_env(BASE_URL_ENV) {
            self.base_url = value;
        }
        if let Some(value) = non_empty_env(PAGE_ORIGIN_ENV) {
            self.page_origin = Some(value);
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
