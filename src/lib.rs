//! Client side of the cluster dashboard: typed status/rank requests and a
//! reconnecting live log stream.

pub mod config;
pub mod dashboard_client;
pub mod log_stream;
pub mod logging;
pub mod types;

pub use config::Config;
pub use dashboard_client::{ClusterSummary, DashboardClient, StatusSnapshot};
pub use log_stream::{ConnectionState, StreamEvent, StreamManager};
pub use types::DashboardError;
