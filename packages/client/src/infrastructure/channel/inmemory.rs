//! In-memory `EventChannel`.
//!
//! Frames pushed with [`InMemoryEventChannel::push`] are delivered to listeners
//! exactly as the WebSocket reader would deliver them; emitted frames are
//! recorded instead of being sent anywhere.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{
    ChannelError, EventChannel, InboundFrame, ListenerChannel, ListenerId, OutboundFrame,
};

use super::registry::ListenerRegistry;

#[derive(Debug, Default)]
struct Inner {
    registry: ListenerRegistry,
    emitted: Vec<OutboundFrame>,
    closed: bool,
}

/// Loopback channel; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventChannel {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a server push. Returns the number of listeners reached.
    pub async fn push(&self, event: &str, payload: Value) -> usize {
        let inner = self.inner.lock().await;
        inner.registry.dispatch(&InboundFrame::new(event, payload))
    }

    /// Frames emitted so far, oldest first.
    pub async fn emitted(&self) -> Vec<OutboundFrame> {
        self.inner.lock().await.emitted.clone()
    }

    /// Make every following `emit` fail with `ChannelError::Closed`.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        inner.registry.clear();
    }
}

#[async_trait]
impl EventChannel for InMemoryEventChannel {
    async fn emit(&self, frame: OutboundFrame) -> Result<(), ChannelError> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(ChannelError::Closed);
        }
        tracing::debug!("Emitted '{}'", frame.event);
        inner.emitted.push(frame);
        Ok(())
    }

    async fn on(&self, event: &str, listener: ListenerChannel) -> ListenerId {
        self.inner.lock().await.registry.add(event, listener)
    }

    async fn off(&self, id: ListenerId) {
        self.inner.lock().await.registry.remove(id);
    }

    async fn listener_count(&self) -> usize {
        self.inner.lock().await.registry.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_push_delivers_to_listener() {
        // テスト項目: push したフレームが登録済みリスナーに届く
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.on("gameStarted", tx).await;

        // when (操作):
        let delivered = channel.push("gameStarted", json!(null)).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.event, "gameStarted");
    }

    #[tokio::test]
    async fn test_emit_after_close_fails() {
        // テスト項目: close 後の送信は Closed エラーになり、記録されない
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        channel.close().await;

        // when (操作):
        let result = channel
            .emit(OutboundFrame {
                event: "syncGame",
                payload: json!({}),
            })
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(ChannelError::Closed));
        assert!(channel.emitted().await.is_empty());
    }
}
