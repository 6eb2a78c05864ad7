use std::sync::Arc;

use chrono::Utc;
use semver::Version;
use tracing::{info, warn};

use cluster_dashboard::dashboard_client::{
    format_bytes, format_uptime, rank_entries, DashboardData, Period, StatusDelta,
    SUPPORTED_API_VERSION,
};
use cluster_dashboard::log_stream::LoggingHandler;
use cluster_dashboard::{logging, Config, DashboardClient, DashboardError, StreamManager};

const TOP_USER_AGENTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let log_level = logging::init();
    let config = Config::load().await;
    log_level.apply_debug(config.debug);
    info!(base_url = %config.base_url, "Starting dashboard-tail");

    let client = DashboardClient::from_config(&config)?;
    match client.refresh().await {
        Ok(data) => report(&data),
        Err(err) => warn!(error = %err, "Initial dashboard refresh failed"),
    }

    let mut stream = StreamManager::from_config(&config)?;
    stream.on_event(Arc::new(LoggingHandler));
    stream.connect()?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    stream.disconnect().await;
    Ok(())
}

fn report(data: &DashboardData) {
    let status = &data.status;

    if let Ok(supported) = Version::parse(SUPPORTED_API_VERSION) {
        if !status.api_compatible(&supported) {
            warn!(
                server = %status.api_version,
                supported = %supported,
                "Server API version may not match this client"
            );
        }
    }

    let uptime = status
        .uptime(Utc::now())
        .map(format_uptime)
        .unwrap_or_else(|| "unknown".to_string());
    info!(
        enabled = status.is_enabled(),
        version = %status.version,
        api_version = %status.api_version,
        uptime = %uptime,
        connections = status.connections,
        memory = %format_bytes(status.memory),
        cpu = status.cpu,
        "Cluster status"
    );

    let delta = StatusDelta::between(None, status);
    for (label, period, change) in [
        ("hours", Period::Hours, delta.period_hours),
        ("days", Period::Days, delta.period_days),
        ("months", Period::Months, delta.period_months),
    ] {
        let totals = status.stats.totals(period);
        info!(
            period = label,
            hits = totals.hits,
            bytes = %format_bytes(totals.bytes),
            hits_change = change.hits as i64,
            "Usage"
        );
    }

    for agent in status.top_user_agents(TOP_USER_AGENTS) {
        info!(user_agent = %agent.user_agent, count = agent.count, "Top user agent");
    }

    for row in rank_entries(&data.rank) {
        info!(
            position = row.position,
            name = %row.name,
            enabled = row.enabled,
            traffic = %row.traffic,
            "Rank"
        );
    }
}
