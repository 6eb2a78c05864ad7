use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::types::DashboardError;

use super::backoff::ReconnectPolicy;
use super::connection::{stop_requested, StreamConnection};
use super::handler::{Handlers, StreamHandler};
use super::lifecycle::{ConnectionState, StreamEvent};
use super::transport::{StreamConnector, WebSocketConnector};

/// Owns the dashboard's single live log connection.
///
/// Nothing touches the network until [`connect`](Self::connect) is called.
/// While connected, dropped connections are re-established according to the
/// [`ReconnectPolicy`]. [`disconnect`](Self::disconnect) closes the
/// connection and delivers its `Close` event. Dropping the manager aborts the
/// stream task instead, and handlers get no `Close`.
pub struct StreamManager {
    url: Url,
    connector: Arc<dyn StreamConnector>,
    policy: ReconnectPolicy,
    handlers: Handlers,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    stop_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl StreamManager {
    pub fn new(url: Url, connector: Arc<dyn StreamConnector>, policy: ReconnectPolicy) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Idle);
        Self {
            url,
            connector,
            policy,
            handlers: Handlers::default(),
            state_tx: Arc::new(state_tx),
            stop_tx: None,
            task: None,
        }
    }

    /// WebSocket-backed manager with the endpoint and reconnect policy taken from `config`.
    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        let url = config.stream_url()?;
        let connector = WebSocketConnector::new(Duration::from_secs(
            config.handshake_timeout_secs.max(1),
        ));
        Ok(Self::new(
            url,
            Arc::new(connector),
            ReconnectPolicy::from(&config.reconnect),
        ))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Register an observer. Handlers added while connected see subsequent events.
    pub fn on_event(&self, handler: Arc<dyn StreamHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Start streaming on the current tokio runtime.
    ///
    /// Calling this while already running does nothing, so at most one
    /// connection exists per manager.
    pub fn connect(&mut self) -> Result<(), DashboardError> {
        if self.is_running() {
            debug!(url = %self.url, "Log stream already running");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|err| {
            DashboardError::Config(format!("no tokio runtime to connect on: {err}"))
        })?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let supervisor = Supervisor {
            url: self.url.clone(),
            connector: Arc::clone(&self.connector),
            policy: self.policy.clone(),
            handlers: self.handlers.clone(),
            state_tx: Arc::clone(&self.state_tx),
        };

        info!(url = %self.url, "Starting log stream");
        self.stop_tx = Some(stop_tx);
        self.task = Some(runtime.spawn(supervisor.run(stop_rx)));
        Ok(())
    }

    /// Close the active connection, stop reconnecting and wait for the
    /// stream task to finish.
    pub async fn disconnect(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            stop_tx.send_replace(true);
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "Log stream task ended abnormally");
            }
        }
        self.state_tx.send_replace(ConnectionState::Closed);
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Supervisor {
    url: Url,
    connector: Arc<dyn StreamConnector>,
    policy: ReconnectPolicy,
    handlers: Handlers,
    state_tx: Arc<watch::Sender<ConnectionState>>,
}

impl Supervisor {
    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        // Consecutive attempts that never reached `Open`.
        let mut attempt: u32 = 0;

        loop {
            let outcome = StreamConnection::new(
                &self.url,
                self.connector.as_ref(),
                &self.handlers,
                &self.state_tx,
            )
            .run(&mut stop_rx)
            .await;

            let stop = outcome.shutdown || *stop_rx.borrow();
            if stop {
                break;
            }
            if outcome.opened {
                attempt = 0;
            }
            attempt = attempt.saturating_add(1);

            let Some(delay) = self.policy.delay_for(attempt) else {
                info!(url = %self.url, attempt, "Not reconnecting log stream");
                break;
            };

            warn!(
                url = %self.url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Log stream dropped, reconnecting"
            );
            self.state_tx.send_replace(ConnectionState::Reconnecting);
            self.handlers.dispatch(&StreamEvent::Reconnecting { attempt, delay });

            tokio::select! {
                biased;
                _ = stop_requested(&mut stop_rx) => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.state_tx.send_replace(ConnectionState::Closed);
    }
}
