use crate::dashboard_client::api::{ClusterSummary, StatusSnapshot};

/// Status and rank fetched together for one dashboard refresh.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub status: StatusSnapshot,
    pub rank: Vec<ClusterSummary>,
}
