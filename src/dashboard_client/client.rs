use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::types::DashboardError;

use super::api::{ClusterSummary, DashboardData, StatusSnapshot};
use super::helpers::{join_url, RANK_PATH, STATUS_PATH};

/// Read-only client for the dashboard's status and rank endpoints.
#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let parsed = Url::parse(base_url)?;
        if parsed.host_str().is_none() {
            return Err(DashboardError::UnsupportedOrigin(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/status`. No retry; the caller decides what to do on failure.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, DashboardError> {
        self.get_json(STATUS_PATH).await
    }

    /// `GET /api/rank`, in the order the server ranked the clusters.
    pub async fn fetch_rank(&self) -> Result<Vec<ClusterSummary>, DashboardError> {
        self.get_json(RANK_PATH).await
    }

    /// Fetch status and rank concurrently.
    pub async fn refresh(&self) -> Result<DashboardData, DashboardError> {
        let (status, rank) = tokio::try_join!(self.fetch_status(), self.fetch_rank())?;
        Ok(DashboardData { status, rank })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
    {
        let url = join_url(&self.base_url, path);
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(DashboardError::Http)?;

        if !response.status().is_success() {
            return Err(DashboardError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response.json::<T>().await.map_err(DashboardError::Http)
    }
}
