use url::Url;

use crate::types::DashboardError;

pub const STREAM_PATH: &str = "/ws/logs";

/// Build the log stream endpoint from the origin the dashboard talks to.
///
/// `https` origins map to `wss`, anything else to `ws`. Host and explicit
/// port are carried over; path, query and fragment are replaced by `path`.
pub fn derive_stream_url(origin: &Url, path: &str) -> Result<Url, DashboardError> {
    let host = origin
        .host_str()
        .ok_or_else(|| DashboardError::UnsupportedOrigin(origin.to_string()))?;
    let scheme = if origin.scheme() == "https" { "wss" } else { "ws" };
    let authority = match origin.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    Ok(Url::parse(&format!("{scheme}://{authority}{path}"))?)
}
