use serde::Serialize;

use crate::dashboard_client::api::ClusterSummary;
use crate::dashboard_client::helpers::format_bytes;

/// Rank table row ready for display.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    pub traffic: String,
}

impl RankEntry {
    pub fn from_summary(position: usize, cluster: &ClusterSummary) -> Self {
        let metric = cluster.metric.as_ref();
        Self {
            position,
            id: cluster.id.clone(),
            name: if cluster.name.is_empty() {
                cluster.id.clone()
            } else {
                cluster.name.clone()
            },
            enabled: cluster.is_enabled,
            hits: metric.map(|m| m.hits),
            bytes: metric.map(|m| m.bytes),
            traffic: metric
                .map(|m| format_bytes(m.bytes))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Rows in server order, positions starting at 1.
pub fn rank_entries(clusters: &[ClusterSummary]) -> Vec<RankEntry> {
    clusters
        .iter()
        .enumerate()
        .map(|(idx, cluster)| RankEntry::from_summary(idx + 1, cluster))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard_client::api::ClusterMetric;

    #[test]
    fn entries_keep_server_order() {
        let clusters = vec![
            ClusterSummary {
                id: "z".to_string(),
                name: "zeta".to_string(),
                is_enabled: true,
                metric: Some(ClusterMetric { bytes: 2048, hits: 9 }),
            },
            ClusterSummary {
                id: "a".to_string(),
                name: String::new(),
                is_enabled: false,
                metric: None,
            },
        ];

        let rows = rank_entries(&clusters);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].name, "zeta");
        assert_eq!(rows[0].traffic, "2.00 KiB");
        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].name, "a");
        assert_eq!(rows[1].traffic, "-");
        assert_eq!(rows[1].hits, None);
    }
}
