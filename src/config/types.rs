use serde::{Deserialize, Serialize};

use crate::log_stream::STREAM_PATH;

/// Configuration for the dashboard client and its live log stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Location the dashboard page is served from, when it differs from the API.
    #[serde(default)]
    pub page_origin: Option<String>,

    #[serde(default)]
    pub stream_origin: Option<StreamOrigin>,

    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Which address the stream endpoint is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamOrigin {
    Page,
    BaseUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_origin: None,
            stream_origin: None,
            stream_path: default_stream_path(),
            request_timeout_secs: default_request_timeout(),
            handshake_timeout_secs: default_handshake_timeout(),
            debug: false,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_attempts: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8800".to_string()
}

fn default_stream_path() -> String {
    STREAM_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    8
}

fn default_handshake_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_initial_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}
