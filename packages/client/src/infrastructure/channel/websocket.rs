//! WebSocket `EventChannel` backed by tokio-tungstenite.
//!
//! The connection is split into two tasks:
//! - reader: parses [`Envelope`] frames and hands them to the listener registry
//! - writer: drains the outbound queue into the socket
//!
//! Once the reader stops (server close or read error) every listener is
//! dropped, so subscribers observe end of stream, and `emit` starts failing
//! with [`ChannelError::Closed`]. Reconnecting means connecting a new channel.

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use reqwest::Url;
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    domain::{ChannelError, EventChannel, InboundFrame, ListenerChannel, ListenerId, OutboundFrame},
    infrastructure::dto::websocket::Envelope,
};

use super::registry::ListenerRegistry;

pub struct WebSocketEventChannel {
    registry: Arc<Mutex<ListenerRegistry>>,
    outbound: mpsc::UnboundedSender<String>,
    closed: watch::Receiver<bool>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Append the bearer token as a percent-encoded `token` query parameter.
pub fn build_url(url: &str, token: Option<&str>) -> Result<Url, ChannelError> {
    let mut url = Url::parse(url)
        .map_err(|e| ChannelError::Connect(format!("Invalid URL '{}': {}", url, e)))?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

impl WebSocketEventChannel {
    /// Connect to the game server's event endpoint.
    ///
    /// # Errors
    ///
    /// * `ChannelError::Unauthorized` - the server answered the upgrade with 401/403
    /// * `ChannelError::Connect` - any other handshake or network failure
    pub async fn connect(url: &str, token: Option<&str>) -> Result<Self, ChannelError> {
        let url = build_url(url, token)?;

        let (ws_stream, _response) = match connect_async(url.as_str()).await {
            Ok(result) => result,
            Err(tungstenite::Error::Http(response))
                if matches!(response.status().as_u16(), 401 | 403) =>
            {
                return Err(ChannelError::Unauthorized);
            }
            Err(e) => return Err(ChannelError::Connect(e.to_string())),
        };
        tracing::info!("Connected to game server event channel");

        let (write, read) = ws_stream.split();
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed) = watch::channel(false);

        let reader = reader_loop(read, registry.clone(), closed_tx);
        let writer = writer_loop(outbound_rx, write);

        Ok(Self {
            registry,
            outbound,
            closed,
            reader,
            writer,
        })
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Wait until the connection is closed.
    pub async fn closed(&self) {
        let mut closed = self.closed.clone();
        // An error means the reader is gone, which is closed as well
        let _ = closed.wait_for(|closed| *closed).await;
    }
}

impl Drop for WebSocketEventChannel {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// Spawns a task that parses incoming frames and dispatches them to listeners.
fn reader_loop<S>(
    mut read: S,
    registry: Arc<Mutex<ListenerRegistry>>,
    closed_tx: watch::Sender<bool>,
) -> JoinHandle<()>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<Envelope>(&text) {
                    Ok(envelope) => {
                        let frame = InboundFrame::new(envelope.event, envelope.data);
                        registry.lock().await.dispatch(&frame);
                    }
                    Err(e) => {
                        tracing::warn!("Dropping unparsable frame: {}", e);
                    }
                },
                Ok(Message::Binary(data)) => {
                    tracing::warn!("Ignoring {} bytes of binary data", data.len());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
            }
        }

        registry.lock().await.clear();
        let _ = closed_tx.send(true);
    })
}

/// Spawns a task that sends queued frames to the socket.
fn writer_loop<S>(mut rx: mpsc::UnboundedReceiver<String>, mut sink: S) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                tracing::warn!("Failed to send frame: {}", e);
                break;
            }
        }
    })
}

#[async_trait]
impl EventChannel for WebSocketEventChannel {
    async fn emit(&self, frame: OutboundFrame) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }

        let envelope = Envelope {
            event: frame.event.to_string(),
            data: frame.payload,
        };
        let json = serde_json::to_string(&envelope)
            .map_err(|e| ChannelError::Connect(format!("failed to serialize frame: {}", e)))?;

        self.outbound.send(json).map_err(|_| ChannelError::Closed)?;
        tracing::debug!("Emitted '{}'", frame.event);
        Ok(())
    }

    async fn on(&self, event: &str, listener: ListenerChannel) -> ListenerId {
        self.registry.lock().await.add(event, listener)
    }

    async fn off(&self, id: ListenerId) {
        self.registry.lock().await.remove(id);
    }

    async fn listener_count(&self) -> usize {
        self.registry.lock().await.count()
    }
}
