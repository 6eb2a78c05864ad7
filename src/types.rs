use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors surfaced by the dashboard HTTP client and the live log stream.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path} returned {status}")]
    Status { path: String, status: StatusCode },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("origin `{0}` has no host to derive a stream endpoint from")]
    UnsupportedOrigin(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("stream handshake did not complete within {0:?}")]
    HandshakeTimeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// True for failures of a request/response exchange: network errors,
    /// undecodable bodies and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, DashboardError::Http(_) | DashboardError::Status { .. })
    }

    /// HTTP status of a rejected response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DashboardError::Status { status, .. } => Some(*status),
            DashboardError::Http(err) => err.status(),
            _ => None,
        }
    }
}
