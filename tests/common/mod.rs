//! Shared fixtures: a scripted stream connector and event helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cluster_dashboard::log_stream::{
    ChannelHandler, CloseInfo, Frame, ReconnectPolicy, StreamConnector, StreamEvent,
    StreamManager, StreamTransport,
};
use cluster_dashboard::DashboardError;
use tokio::sync::mpsc;
use url::Url;

pub enum ScriptFrame {
    Text(&'static str),
    Error(&'static str),
    Close(u16),
}

/// What the transport does once its scripted frames run out.
#[derive(Clone, Copy)]
pub enum After {
    End,
    Hang,
}

pub enum Script {
    Refuse,
    Frames(Vec<ScriptFrame>, After),
}

impl Script {
    pub fn lines(lines: &[&'static str], after: After) -> Self {
        Script::Frames(lines.iter().copied().map(ScriptFrame::Text).collect(), after)
    }
}

/// Hands out one scripted transport per `connect`; refuses once the scripts run out.
#[derive(Default)]
pub struct ScriptedConnector {
    scripts: Mutex<VecDeque<Script>>,
    connects: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

fn refused() -> DashboardError {
    DashboardError::Io(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl StreamConnector for ScriptedConnector {
    async fn connect(&self, _url: &Url) -> Result<Box<dyn StreamTransport>, DashboardError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            None | Some(Script::Refuse) => Err(refused()),
            Some(Script::Frames(frames, after)) => Ok(Box::new(ScriptedTransport {
                frames: frames.into(),
                after,
                closes: Arc::clone(&self.closes),
            })),
        }
    }
}

struct ScriptedTransport {
    frames: VecDeque<ScriptFrame>,
    after: After,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl StreamTransport for ScriptedTransport {
    async fn next_frame(&mut self) -> Option<Result<Frame, DashboardError>> {
        match self.frames.pop_front() {
            Some(ScriptFrame::Text(line)) => Some(Ok(Frame::Text(line.to_string()))),
            Some(ScriptFrame::Error(message)) => Some(Err(DashboardError::Io(io::Error::new(
                io::ErrorKind::Other,
                message,
            )))),
            Some(ScriptFrame::Close(code)) => Some(Ok(Frame::Close(CloseInfo {
                code: Some(code),
                reason: "server closing".to_string(),
            }))),
            None => match self.after {
                After::End => None,
                After::Hang => std::future::pending().await,
            },
        }
    }

    async fn close(&mut self) -> Result<(), DashboardError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn stream_url() -> Url {
    Url::parse("ws://dashboard.test/ws/logs").unwrap()
}

pub fn manager_with(
    connector: Arc<ScriptedConnector>,
    policy: ReconnectPolicy,
) -> (StreamManager, mpsc::Receiver<StreamEvent>) {
    let manager = StreamManager::new(stream_url(), connector, policy);
    let (handler, rx) = ChannelHandler::new(64);
    manager.on_event(Arc::new(handler));
    (manager, rx)
}

pub fn label(event: &StreamEvent) -> String {
    match event {
        StreamEvent::Open => "open".to_string(),
        StreamEvent::Message(log) => format!("message:{}", log.line),
        StreamEvent::Error { .. } => "error".to_string(),
        StreamEvent::Close(info) => match info.code {
            Some(code) => format!("close:{code}"),
            None => "close".to_string(),
        },
        StreamEvent::Reconnecting { attempt, delay } => {
            format!("reconnecting:{attempt}:{}ms", delay.as_millis())
        }
    }
}

pub async fn next_event(rx: &mut mpsc::Receiver<StreamEvent>) -> StreamEvent {
    tokio::time::timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("timed out waiting for a stream event")
        .expect("event channel closed")
}

pub async fn collect_labels(rx: &mut mpsc::Receiver<StreamEvent>, count: usize) -> Vec<String> {
    let mut labels = Vec::with_capacity(count);
    for _ in 0..count {
        labels.push(label(&next_event(rx).await));
    }
    labels
}

pub async fn assert_quiet(rx: &mut mpsc::Receiver<StreamEvent>) {
    let result = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
    if let Ok(Some(event)) = result {
        panic!("unexpected stream event: {}", label(&event));
    }
}
