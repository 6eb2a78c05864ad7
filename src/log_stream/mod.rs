//! Live log stream: endpoint derivation, connection lifecycle and reconnects.

mod backoff;
mod connection;
mod endpoint;
mod handler;
mod lifecycle;
mod manager;
mod transport;

pub use backoff::ReconnectPolicy;
pub use connection::ConnectionOutcome;
pub use endpoint::{derive_stream_url, STREAM_PATH};
pub use handler::{ChannelHandler, FnHandler, LoggingHandler, StreamHandler};
pub use lifecycle::{CloseInfo, ConnectionState, LifecycleGuard, LogEvent, StreamEvent};
pub use manager::StreamManager;
pub use transport::{Frame, StreamConnector, StreamTransport, WebSocketConnector, WebSocketTransport};
