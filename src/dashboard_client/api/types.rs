use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bucket of a usage series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsData {
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub bytes: u64,
}

/// Hourly, daily and monthly usage series, oldest bucket first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub hours: Vec<StatsData>,
    #[serde(default)]
    pub days: Vec<StatsData>,
    #[serde(default)]
    pub months: Vec<StatsData>,
}

/// Body of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub prev_stats: Stats,
    /// Request count per user agent.
    #[serde(default)]
    pub accesses: HashMap<String, u64>,
    #[serde(default)]
    pub connections: u64,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub cpu_type: String,
    #[serde(default)]
    pub python_version: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub version: String,
}

/// One element of `GET /api/rank`, in server rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "isEnabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub metric: Option<ClusterMetric>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMetric {
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub hits: u64,
}
