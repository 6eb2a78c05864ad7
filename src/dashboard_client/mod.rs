mod api;
mod client;
mod helpers;
mod models;

pub use api::{ClusterMetric, ClusterSummary, DashboardData, Stats, StatsData, StatusSnapshot};
pub use client::DashboardClient;
pub use helpers::{format_bytes, format_uptime, RANK_PATH, STATUS_PATH, SUPPORTED_API_VERSION};
pub use models::{
    rank_entries, Period, RankEntry, SeriesTotals, StatusDelta, TotalsDelta, UserAgentCount,
};
