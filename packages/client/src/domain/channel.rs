//! イベントチャンネル trait 定義
//!
//! サーバーとの双方向イベント接続（Connection Handle）へのインターフェース。
//! 接続の確立・再接続は実装側（Infrastructure 層）の責務です。

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use super::error::ChannelError;

/// 受信したイベント 1 件（イベント名と生のペイロード）
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFrame {
    pub event: String,
    pub payload: Value,
}

impl InboundFrame {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// 送信するイベント 1 件
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundFrame {
    pub event: &'static str,
    pub payload: Value,
}

/// リスナー登録の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// 受信イベントを受け取るチャンネル
pub type ListenerChannel = mpsc::UnboundedSender<InboundFrame>;

/// Connection Handle
///
/// 1 本の接続を複数のコンポーネントが共有します。
/// 各コンポーネントは自分が必要なイベント名だけを購読し、後始末で対称的に解除します。
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// イベントを送信（fire-and-forget）
    async fn emit(&self, frame: OutboundFrame) -> Result<(), ChannelError>;

    /// イベント名にリスナーを登録
    async fn on(&self, event: &str, listener: ListenerChannel) -> ListenerId;

    /// リスナーを解除（未登録の ID は無視）
    async fn off(&self, id: ListenerId);

    /// 登録中のリスナー数
    async fn listener_count(&self) -> usize;
}
