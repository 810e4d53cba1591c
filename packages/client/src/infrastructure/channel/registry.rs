//! Listener bookkeeping shared by the channel implementations.

use std::collections::HashMap;

use crate::domain::{InboundFrame, ListenerChannel, ListenerId};

/// Map of event name to the listeners subscribed to it.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: HashMap<String, Vec<(ListenerId, ListenerChannel)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: &str, listener: ListenerChannel) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        tracing::debug!("Listener {:?} registered for '{}'", id, event);
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        self.listeners.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed |= entries.len() != before;
            !entries.is_empty()
        });
        if removed {
            tracing::debug!("Listener {:?} unregistered", id);
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Deliver a frame to every listener of its event name.
    ///
    /// Listeners whose receiving side is gone are skipped with a warning.
    /// Returns the number of listeners that received the frame.
    pub fn dispatch(&self, frame: &InboundFrame) -> usize {
        let Some(entries) = self.listeners.get(&frame.event) else {
            tracing::debug!("No listener for '{}', dropping frame", frame.event);
            return 0;
        };

        let mut delivered = 0;
        for (id, listener) in entries {
            if let Err(e) = listener.send(frame.clone()) {
                tracing::warn!("Failed to deliver '{}' to {:?}: {}", frame.event, id, e);
            } else {
                delivered += 1;
            }
        }
        delivered
    }

    /// Drop every listener (their receivers observe end of stream).
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_dispatch_reaches_only_matching_listeners() {
        // テスト項目: イベント名が一致するリスナーにだけフレームが届く
        // given (前提条件):
        let mut registry = ListenerRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.add("newMessage", tx1);
        registry.add("kicked", tx2);

        // when (操作):
        let frame = InboundFrame::new("newMessage", json!({"message": "hi"}));
        let delivered = registry.dispatch(&frame);

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await, Some(frame));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_tolerates_dropped_receiver() {
        // テスト項目: 受信側が破棄されたリスナーがあっても他のリスナーには届く
        // given (前提条件):
        let mut registry = ListenerRegistry::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.add("gameStarted", tx1);
        registry.add("gameStarted", tx2);
        drop(rx1);

        // when (操作):
        let delivered = registry.dispatch(&InboundFrame::new("gameStarted", json!(null)));

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx2.recv().await.is_some());
    }

    #[test]
    fn test_remove_restores_count() {
        // テスト項目: 登録したリスナーを全て解除すると件数が 0 に戻る
        // given (前提条件):
        let mut registry = ListenerRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = registry.add("lobbyUpdate", tx.clone());
        let b = registry.add("lobbyUpdate", tx.clone());
        let c = registry.add("kicked", tx);
        assert_eq!(registry.count(), 3);

        // when (操作):
        let removed = [registry.remove(a), registry.remove(b), registry.remove(c)];

        // then (期待する結果):
        assert_eq!(removed, [true, true, true]);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        // テスト項目: 未登録の ID を解除しても何も起きない（冪等性）
        // given (前提条件):
        let mut registry = ListenerRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.add("kicked", tx);
        registry.remove(id);

        // when (操作):
        let removed = registry.remove(id);

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.count(), 0);
    }
}
