use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, info, warn};

use super::lifecycle::{CloseInfo, LogEvent, StreamEvent};

/// Observer of stream lifecycle events.
///
/// Callbacks run on the stream task and must return quickly; hand slow work
/// off to another task (see [`ChannelHandler`]).
pub trait StreamHandler: Send + Sync {
    fn handle(&self, event: &StreamEvent) {
        match event {
            StreamEvent::Open => self.on_open(),
            StreamEvent::Message(log) => self.on_message(log),
            StreamEvent::Error { message } => self.on_error(message),
            StreamEvent::Close(info) => self.on_close(info),
            StreamEvent::Reconnecting { attempt, delay } => self.on_reconnecting(*attempt, *delay),
        }
    }

    fn on_open(&self) {}

    fn on_message(&self, _event: &LogEvent) {}

    fn on_error(&self, _message: &str) {}

    fn on_close(&self, _info: &CloseInfo) {}

    fn on_reconnecting(&self, _attempt: u32, _delay: Duration) {}
}

/// Writes every lifecycle event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl StreamHandler for LoggingHandler {
    fn on_open(&self) {
        info!("WebSocket connection established.");
    }

    fn on_message(&self, event: &LogEvent) {
        info!(line = %event.line, "Received log");
    }

    fn on_error(&self, message: &str) {
        error!(error = %message, "WebSocket error");
    }

    fn on_close(&self, info: &CloseInfo) {
        info!(code = ?info.code, reason = %info.reason, "WebSocket connection closed.");
    }

    fn on_reconnecting(&self, attempt: u32, delay: Duration) {
        warn!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting log stream");
    }
}

/// Forwards events into a bounded channel without ever blocking the stream.
/// Events that don't fit are dropped and counted.
pub struct ChannelHandler {
    tx: mpsc::Sender<StreamEvent>,
    dropped: AtomicU64,
}

impl ChannelHandler {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl StreamHandler for ChannelHandler {
    fn handle(&self, event: &StreamEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(dropped, "Stream event channel full, dropping event");
            }
            // Receiver gone; nobody is listening any more.
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// Adapts a closure into a handler.
pub struct FnHandler<F>(pub F);

impl<F> StreamHandler for FnHandler<F>
where
    F: Fn(&StreamEvent) + Send + Sync,
{
    fn handle(&self, event: &StreamEvent) {
        (self.0)(event)
    }
}

/// Registered handlers, shared between the manager and its stream task.
#[derive(Clone, Default)]
pub(crate) struct Handlers {
    inner: Arc<RwLock<Vec<Arc<dyn StreamHandler>>>>,
}

impl Handlers {
    pub fn push(&self, handler: Arc<dyn StreamHandler>) {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(handler);
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Deliver `event` to every handler in registration order.
    pub fn dispatch(&self, event: &StreamEvent) {
        // Snapshot so a handler may register another without deadlocking.
        let handlers: Vec<Arc<dyn StreamHandler>> = self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for handler in handlers {
            handler.handle(event);
        }
    }
}
