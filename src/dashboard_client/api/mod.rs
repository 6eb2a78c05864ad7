mod responses;
mod types;

pub use responses::DashboardData;
pub use types::{ClusterMetric, ClusterSummary, Stats, StatsData, StatusSnapshot};
