use chrono::{DateTime, TimeDelta, Utc};
use semver::Version;
use serde::Serialize;

use crate::dashboard_client::api::{Stats, StatsData, StatusSnapshot};
use crate::dashboard_client::helpers::timestamp_to_datetime;

/// Summed hits and bytes over one usage series.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesTotals {
    pub hits: u64,
    pub bytes: u64,
}

impl SeriesTotals {
    fn of(series: &[StatsData]) -> Self {
        series.iter().fold(Self::default(), |acc, bucket| Self {
            hits: acc.hits.saturating_add(bucket.hits),
            bytes: acc.bytes.saturating_add(bucket.bytes),
        })
    }
}

/// Which of the three usage series to look at.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Hours,
    Days,
    Months,
}

impl Stats {
    pub fn series(&self, period: Period) -> &[StatsData] {
        match period {
            Period::Hours => &self.hours,
            Period::Days => &self.days,
            Period::Months => &self.months,
        }
    }

    pub fn totals(&self, period: Period) -> SeriesTotals {
        SeriesTotals::of(self.series(period))
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UserAgentCount {
    pub user_agent: String,
    pub count: u64,
}

impl StatusSnapshot {
    pub fn is_enabled(&self) -> bool {
        self.status != 0
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.start_time)
    }

    pub fn uptime(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.started_at()
            .map(|started| now.signed_duration_since(started).max(TimeDelta::zero()))
    }

    /// Most frequent user agents, ties broken by name.
    pub fn top_user_agents(&self, limit: usize) -> Vec<UserAgentCount> {
        let mut agents: Vec<UserAgentCount> = self
            .accesses
            .iter()
            .map(|(user_agent, count)| UserAgentCount {
                user_agent: user_agent.clone(),
                count: *count,
            })
            .collect();
        agents.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.user_agent.cmp(&b.user_agent))
        });
        agents.truncate(limit);
        agents
    }

    /// Whether the server speaks the same major API version as `supported`.
    pub fn api_compatible(&self, supported: &Version) -> bool {
        match Version::parse(self.api_version.trim()) {
            Ok(version) => version.major == supported.major,
            Err(_) => false,
        }
    }
}

/// Signed change of one usage series.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsDelta {
    pub hits: i128,
    pub bytes: i128,
}

impl TotalsDelta {
    fn between(previous: SeriesTotals, current: SeriesTotals) -> Self {
        Self {
            hits: current.hits as i128 - previous.hits as i128,
            bytes: current.bytes as i128 - previous.bytes as i128,
        }
    }
}

/// Differences used for delta display.
///
/// `period_*` compare the current usage series against the server-reported
/// previous period; `connections`/`memory` compare two consecutive snapshots.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusDelta {
    pub period_hours: TotalsDelta,
    pub period_days: TotalsDelta,
    pub period_months: TotalsDelta,
    pub connections: i64,
    pub memory: i128,
}

impl StatusDelta {
    pub fn between(previous: Option<&StatusSnapshot>, current: &StatusSnapshot) -> Self {
        let period = |p: Period| {
            TotalsDelta::between(current.prev_stats.totals(p), current.stats.totals(p))
        };
        let (connections, memory) = match previous {
            Some(prev) => (
                current.connections as i64 - prev.connections as i64,
                current.memory as i128 - prev.memory as i128,
            ),
            None => (0, 0),
        };

        Self {
            period_hours: period(Period::Hours),
            period_days: period(Period::Days),
            period_months: period(Period::Months),
            connections,
            memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bucket(hits: u64, bytes: u64) -> StatsData {
        StatsData { hits, bytes }
    }

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            status: 1,
            start_time: 1_700_000_000_000.0,
            stats: Stats {
                hours: vec![bucket(3, 300), bucket(2, 200)],
                days: vec![bucket(10, 1000)],
                months: vec![],
            },
            prev_stats: Stats {
                hours: vec![bucket(1, 100)],
                days: vec![bucket(12, 1500)],
                months: vec![],
            },
            accesses: [("b-agent", 5), ("a-agent", 5), ("c-agent", 9)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            connections: 4,
            memory: 1000,
            api_version: "1.13.1".to_string(),
            ..StatusSnapshot::default()
        }
    }

    #[test]
    fn totals_sum_a_series() {
        let snap = snapshot();
        assert_eq!(
            snap.stats.totals(Period::Hours),
            SeriesTotals { hits: 5, bytes: 500 }
        );
        assert_eq!(snap.stats.totals(Period::Months), SeriesTotals::default());
    }

    #[test]
    fn top_user_agents_orders_by_count_then_name() {
        let top = snapshot().top_user_agents(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_agent, "c-agent");
        assert_eq!(top[1].user_agent, "a-agent");
    }

    #[test]
    fn uptime_is_measured_from_start_time() {
        let snap = snapshot();
        let now = Utc.timestamp_millis_opt(1_700_000_090_000).unwrap();
        assert_eq!(snap.uptime(now), Some(TimeDelta::seconds(90)));
        assert!(snap.is_enabled());
    }

    #[test]
    fn api_compatibility_checks_major_version() {
        let mut snap = snapshot();
        assert!(snap.api_compatible(&Version::new(1, 0, 0)));
        assert!(!snap.api_compatible(&Version::new(2, 0, 0)));
        snap.api_version = "unknown".to_string();
        assert!(!snap.api_compatible(&Version::new(1, 0, 0)));
    }

    #[test]
    fn delta_compares_periods_and_snapshots() {
        let previous = StatusSnapshot {
            connections: 6,
            memory: 1500,
            ..snapshot()
        };
        let delta = StatusDelta::between(Some(&previous), &snapshot());
        assert_eq!(delta.period_hours, TotalsDelta { hits: 4, bytes: 400 });
        assert_eq!(delta.period_days, TotalsDelta { hits: -2, bytes: -500 });
        assert_eq!(delta.connections, -2);
        assert_eq!(delta.memory, -500);

        let first = StatusDelta::between(None, &snapshot());
        assert_eq!(first.connections, 0);
    }
}
