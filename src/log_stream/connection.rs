use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use crate::types::DashboardError;

use super::handler::Handlers;
use super::lifecycle::{CloseInfo, ConnectionState, LifecycleGuard, LogEvent, StreamEvent};
use super::transport::{Frame, StreamConnector, StreamTransport};

/// How a single connection instance ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionOutcome {
    /// The handshake succeeded and `Open` was delivered.
    pub opened: bool,
    /// Ended because the owner asked it to.
    pub shutdown: bool,
    pub messages: u64,
}

enum Step {
    Stop,
    Frame(Option<Result<Frame, DashboardError>>),
}

/// Drives exactly one connection from `Connecting` to `Closed`.
pub(crate) struct StreamConnection<'a> {
    url: &'a Url,
    connector: &'a dyn StreamConnector,
    handlers: &'a Handlers,
    state: &'a watch::Sender<ConnectionState>,
    guard: LifecycleGuard,
    outcome: ConnectionOutcome,
}

impl<'a> StreamConnection<'a> {
    pub fn new(
        url: &'a Url,
        connector: &'a dyn StreamConnector,
        handlers: &'a Handlers,
        state: &'a watch::Sender<ConnectionState>,
    ) -> Self {
        Self {
            url,
            connector,
            handlers,
            state,
            guard: LifecycleGuard::new(),
            outcome: ConnectionOutcome::default(),
        }
    }

    pub async fn run(mut self, stop: &mut watch::Receiver<bool>) -> ConnectionOutcome {
        self.state.send_replace(ConnectionState::Connecting);
        debug!(url = %self.url, "Connecting log stream");

        let connected = tokio::select! {
            biased;
            _ = stop_requested(stop) => None,
            result = self.connector.connect(self.url) => Some(result),
        };

        let mut transport = match connected {
            None => {
                self.outcome.shutdown = true;
                self.close(CloseInfo::normal("disconnected before open"));
                return self.outcome;
            }
            Some(Err(err)) => {
                warn!(url = %self.url, error = %err, "Log stream handshake failed");
                self.error(err.to_string());
                self.close(CloseInfo::abnormal("handshake failed"));
                return self.outcome;
            }
            Some(Ok(transport)) => transport,
        };

        self.open();

        loop {
            let step = tokio::select! {
                biased;
                _ = stop_requested(stop) => Step::Stop,
                frame = transport.next_frame() => Step::Frame(frame),
            };

            match step {
                Step::Stop => {
                    self.outcome.shutdown = true;
                    shutdown_transport(transport.as_mut()).await;
                    self.close(CloseInfo::normal("client disconnect"));
                    break;
                }
                Step::Frame(Some(Ok(Frame::Text(line)))) => self.message(line),
                Step::Frame(Some(Ok(Frame::Close(info)))) => {
                    self.close(info);
                    break;
                }
                Step::Frame(Some(Err(err))) => self.error(err.to_string()),
                Step::Frame(None) => {
                    self.close(CloseInfo::abnormal("connection lost"));
                    break;
                }
            }
        }

        self.outcome
    }

    fn open(&mut self) {
        if self.guard.open() {
            self.outcome.opened = true;
            self.state.send_replace(ConnectionState::Open);
            info!(url = %self.url, "Log stream open");
            self.handlers.dispatch(&StreamEvent::Open);
        }
    }

    fn message(&mut self, line: String) {
        if !self.guard.message() {
            return;
        }
        // A frame after a transient error means the stream is usable again.
        if *self.state.borrow() == ConnectionState::Errored {
            self.state.send_replace(ConnectionState::Open);
        }
        self.outcome.messages += 1;
        self.handlers.dispatch(&StreamEvent::Message(LogEvent::new(line)));
    }

    fn error(&mut self, message: String) {
        if self.guard.error() {
            self.state.send_replace(ConnectionState::Errored);
            self.handlers.dispatch(&StreamEvent::Error { message });
        }
    }

    fn close(&mut self, info: CloseInfo) {
        if self.guard.close() {
            self.state.send_replace(ConnectionState::Closed);
            info!(
                url = %self.url,
                code = ?info.code,
                messages = self.outcome.messages,
                "Log stream closed"
            );
            self.handlers.dispatch(&StreamEvent::Close(info));
        }
    }
}

async fn shutdown_transport(transport: &mut dyn StreamTransport) {
    if let Err(err) = transport.close().await {
        debug!(error = %err, "Error while closing log stream");
    }
}

/// Resolves once a stop was requested or the owner went away.
pub(crate) async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stop| *stop).await;
}
