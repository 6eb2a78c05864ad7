//! Connection seam between the stream runner and the wire.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::CloseFrame, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, trace};
use url::Url;

use crate::types::DashboardError;

use super::lifecycle::CloseInfo;

/// What a transport hands back for each received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Close(CloseInfo),
}

/// Opens a fresh transport for every connection attempt.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    async fn connect(&self, url: &Url) -> Result<Box<dyn StreamTransport>, DashboardError>;
}

/// One established, receive-only stream.
#[async_trait]
pub trait StreamTransport: Send {
    /// Next frame, or `None` once the stream has ended. After an error the
    /// transport is free to end the stream.
    async fn next_frame(&mut self) -> Option<Result<Frame, DashboardError>>;

    /// Initiate a client-side close.
    async fn close(&mut self) -> Result<(), DashboardError>;
}

#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    handshake_timeout: Duration,
}

impl WebSocketConnector {
    pub fn new(handshake_timeout: Duration) -> Self {
        Self { handshake_timeout }
    }
}

impl Default for WebSocketConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl StreamConnector for WebSocketConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn StreamTransport>, DashboardError> {
        let handshake = connect_async(url.as_str());
        let (stream, response) = tokio::time::timeout(self.handshake_timeout, handshake)
            .await
            .map_err(|_| DashboardError::HandshakeTimeout(self.handshake_timeout))??;

        debug!(url = %url, status = %response.status(), "Stream handshake complete");
        Ok(Box::new(WebSocketTransport::new(stream)))
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WebSocketTransport {
    inner: WsStream,
    finished: bool,
}

impl WebSocketTransport {
    fn new(inner: WsStream) -> Self {
        Self {
            inner,
            finished: false,
        }
    }
}

#[async_trait]
impl StreamTransport for WebSocketTransport {
    async fn next_frame(&mut self) -> Option<Result<Frame, DashboardError>> {
        if self.finished {
            return None;
        }

        loop {
            match self.inner.next().await {
                Some(Ok(WsMessage::Text(text))) => return Some(Ok(Frame::Text(text))),
                Some(Ok(WsMessage::Binary(data))) => {
                    return Some(Ok(Frame::Text(String::from_utf8_lossy(&data).into_owned())))
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    self.finished = true;
                    return Some(Ok(Frame::Close(close_info(frame))));
                }
                // Pings are answered by tungstenite itself.
                Some(Ok(other)) => {
                    trace!(kind = ?other, "Ignoring control frame");
                }
                Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed))
                | None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(DashboardError::WebSocket(err)));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), DashboardError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        match self.inner.close(None).await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(err) => Err(DashboardError::WebSocket(err)),
        }
    }
}

fn close_info(frame: Option<CloseFrame<'static>>) -> CloseInfo {
    match frame {
        Some(frame) => CloseInfo {
            code: Some(u16::from(frame.code)),
            reason: frame.reason.into_owned(),
        },
        None => CloseInfo::default(),
    }
}
