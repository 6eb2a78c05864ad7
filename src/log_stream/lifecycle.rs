use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observable state of the live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Created, `connect` not called yet.
    Idle,
    Connecting,
    Open,
    /// Waiting out a backoff delay before the next attempt.
    Reconnecting,
    Errored,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Errored => "errored",
            ConnectionState::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// One streamed log line. The payload is opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub line: String,
    pub received_at: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloseInfo {
    pub code: Option<u16>,
    pub reason: String,
}

impl CloseInfo {
    pub const NORMAL: u16 = 1000;
    pub const ABNORMAL: u16 = 1006;

    pub fn normal(reason: impl Into<String>) -> Self {
        Self {
            code: Some(Self::NORMAL),
            reason: reason.into(),
        }
    }

    /// Connection dropped without a close frame.
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self {
            code: Some(Self::ABNORMAL),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamEvent {
    Open,
    Message(LogEvent),
    Error { message: String },
    Close(CloseInfo),
    Reconnecting { attempt: u32, delay: Duration },
}

/// Per-connection ordering rules: open at most once, messages only while
/// open, close exactly once and nothing after it.
#[derive(Debug, Default)]
pub struct LifecycleGuard {
    opened: bool,
    closed: bool,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) -> bool {
        if self.closed || self.opened {
            return false;
        }
        self.opened = true;
        true
    }

    pub fn message(&self) -> bool {
        self.opened && !self.closed
    }

    pub fn error(&self) -> bool {
        !self.closed
    }

    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        true
    }

    pub fn opened(&self) -> bool {
        self.opened
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}
