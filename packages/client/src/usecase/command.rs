//! UseCase: コマンド送信
//!
//! 送信するコマンドごとに相関 ID を採番してペイロードに埋め込み、
//! `Pending -> Acknowledged | Failed` の状態を追跡します。
//! タイムアウトや再送は行いません。
//! 決着したコマンドは直近 [`SETTLED_HISTORY`] 件だけ保持します。

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use p42_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ChatTarget, ClientCommand, CommandStatus, CorrelationId, EventChannel, MessageText,
        ModerationAction, Nickname, PlayerId, RoomId, Timestamp,
    },
    infrastructure::dto::conversion::encode_command,
};

use super::error::CommandError;

/// 追跡中のコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCommand {
    pub event: &'static str,
    pub sent_at: Timestamp,
    pub status: CommandStatus,
}

/// 決着後も状態を問い合わせられるコマンドの件数
pub const SETTLED_HISTORY: usize = 32;

#[derive(Default)]
struct CommandTable {
    entries: HashMap<CorrelationId, TrackedCommand>,
    /// 決着した順の相関 ID（古いものから破棄）
    settled: VecDeque<CorrelationId>,
}

impl CommandTable {
    fn settle(&mut self, correlation_id: CorrelationId, status: CommandStatus) -> bool {
        let Some(tracked) = self.entries.get_mut(&correlation_id) else {
            tracing::debug!("Ignoring settlement for unknown command {}", correlation_id);
            return false;
        };
        tracing::debug!(
            "Command '{}' ({}) settled: {:?}",
            tracked.event,
            correlation_id,
            status
        );
        let was_pending = tracked.status == CommandStatus::Pending;
        tracked.status = status;

        if was_pending {
            self.settled.push_back(correlation_id);
            while self.settled.len() > SETTLED_HISTORY {
                if let Some(oldest) = self.settled.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
        true
    }
}

/// 1 ルームに対するコマンド送信口（clone は状態を共有）
#[derive(Clone)]
pub struct CommandEmitter {
    channel: Arc<dyn EventChannel>,
    room_id: RoomId,
    commands: Arc<Mutex<CommandTable>>,
    clock: Arc<dyn Clock>,
}

impl CommandEmitter {
    pub fn new(channel: Arc<dyn EventChannel>, room_id: RoomId, clock: Arc<dyn Clock>) -> Self {
        Self {
            channel,
            room_id,
            commands: Arc::new(Mutex::new(CommandTable::default())),
            clock,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// コマンドを送信し、採番した相関 ID を返す
    ///
    /// # Errors
    ///
    /// * `CommandError::Encode` - ペイロードを組み立てられない
    /// * `CommandError::Channel` - チャンネルが送信を拒否した（`Failed` として記録される）
    pub async fn send(&self, command: ClientCommand) -> Result<CorrelationId, CommandError> {
        let correlation_id = CorrelationId::generate();
        let frame = encode_command(&command, correlation_id)?;
        let event = frame.event;

        // 即座に応答が届いても見つけられるよう、送信前に登録する
        self.commands.lock().await.entries.insert(
            correlation_id,
            TrackedCommand {
                event,
                sent_at: Timestamp::new(self.clock.now_millis()),
                status: CommandStatus::Pending,
            },
        );

        if let Err(e) = self.channel.emit(frame).await {
            tracing::warn!("Failed to emit '{}' ({}): {}", event, correlation_id, e);
            self.settle(correlation_id, CommandStatus::Failed(e.to_string()))
                .await;
            return Err(CommandError::Channel(e));
        }

        tracing::debug!("Sent '{}' ({})", event, correlation_id);
        Ok(correlation_id)
    }

    pub async fn status(&self, correlation_id: &CorrelationId) -> Option<CommandStatus> {
        self.commands
            .lock()
            .await
            .entries
            .get(correlation_id)
            .map(|tracked| tracked.status.clone())
    }

    /// コマンドの状態を確定する
    ///
    /// 未知の相関 ID（他画面のコマンドや破棄済みのもの）は無視し、`false` を返します。
    pub async fn settle(&self, correlation_id: CorrelationId, status: CommandStatus) -> bool {
        self.commands.lock().await.settle(correlation_id, status)
    }

    /// 応答待ちのコマンド数
    pub async fn pending_count(&self) -> usize {
        self.commands
            .lock()
            .await
            .entries
            .values()
            .filter(|tracked| tracked.status == CommandStatus::Pending)
            .count()
    }

    pub async fn join(&self, password: Option<String>) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::JoinRoom {
            room_id: self.room_id.clone(),
            password,
        })
        .await
    }

    /// サーバーに最新状態の再送を依頼
    pub async fn sync(&self) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::SyncGame {
            room_id: self.room_id.clone(),
        })
        .await
    }

    pub async fn moderate(
        &self,
        target: PlayerId,
        action: ModerationAction,
    ) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::Moderation {
            room_id: self.room_id.clone(),
            target,
            action,
        })
        .await
    }

    pub async fn throw_item(
        &self,
        item: String,
        target: PlayerId,
    ) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::ThrowItem {
            room_id: self.room_id.clone(),
            item,
            target,
        })
        .await
    }

    pub async fn send_chat(
        &self,
        channel: u32,
        text: MessageText,
        target: ChatTarget,
    ) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::SendMessage {
            room_id: self.room_id.clone(),
            channel,
            text,
            target,
        })
        .await
    }

    pub async fn rename(&self, nickname: Nickname) -> Result<CorrelationId, CommandError> {
        self.send(ClientCommand::Rename {
            room_id: self.room_id.clone(),
            nickname,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ChannelError, infrastructure::channel::InMemoryEventChannel};
    use p42_shared::time::FixedClock;

    fn emitter(channel: &InMemoryEventChannel) -> CommandEmitter {
        CommandEmitter::new(
            Arc::new(channel.clone()),
            RoomId::new("room-1".to_string()).unwrap(),
            Arc::new(FixedClock::new(1_000)),
        )
    }

    #[tokio::test]
    async fn test_send_embeds_correlation_id_and_tracks_pending() {
        // テスト項目: 送信したコマンドは相関 ID がペイロードに入り、Pending として追跡される
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        let emitter = emitter(&channel);

        // when (操作):
        let correlation_id = emitter.sync().await.unwrap();

        // then (期待する結果):
        let emitted = channel.emitted().await;
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].event, "syncGame");
        assert_eq!(
            emitted[0].payload["correlationId"],
            correlation_id.as_uuid().to_string()
        );
        assert_eq!(emitted[0].payload["roomId"], "room-1");
        assert_eq!(emitter.status(&correlation_id).await, Some(CommandStatus::Pending));
        assert_eq!(emitter.pending_count().await, 1);
    }

    #[tokio::test]
    async fn test_settle_moves_command_out_of_pending() {
        // テスト項目: 決着したコマンドは Pending でなくなる
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        let emitter = emitter(&channel);
        let accepted = emitter.join(None).await.unwrap();
        let rejected = emitter
            .rename(Nickname::new("Wolf".to_string()).unwrap())
            .await
            .unwrap();

        // when (操作):
        let settled_a = emitter.settle(accepted, CommandStatus::Acknowledged).await;
        let settled_b = emitter
            .settle(rejected, CommandStatus::Failed("taken".to_string()))
            .await;

        // then (期待する結果):
        assert!(settled_a && settled_b);
        assert_eq!(emitter.status(&accepted).await, Some(CommandStatus::Acknowledged));
        assert_eq!(
            emitter.status(&rejected).await,
            Some(CommandStatus::Failed("taken".to_string()))
        );
        assert_eq!(emitter.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_settle_unknown_command_is_ignored() {
        // テスト項目: 未知の相関 ID の決着は無視される
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        let emitter = emitter(&channel);

        // when (操作):
        let settled = emitter
            .settle(CorrelationId::generate(), CommandStatus::Acknowledged)
            .await;

        // then (期待する結果):
        assert!(!settled);
    }

    #[tokio::test]
    async fn test_settled_commands_are_evicted_oldest_first() {
        // テスト項目: 決着したコマンドは直近の一定件数だけ残り、古いものから破棄される
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        let emitter = emitter(&channel);
        let waiting = emitter.join(None).await.unwrap();
        let mut ids = Vec::new();
        for _ in 0..=SETTLED_HISTORY {
            ids.push(emitter.sync().await.unwrap());
        }

        // when (操作):
        for id in &ids {
            emitter.settle(*id, CommandStatus::Acknowledged).await;
        }

        // then (期待する結果): 最古の 1 件だけが破棄され、応答待ちは残る
        assert_eq!(emitter.status(&ids[0]).await, None);
        assert_eq!(
            emitter.status(&ids[SETTLED_HISTORY]).await,
            Some(CommandStatus::Acknowledged)
        );
        assert_eq!(emitter.status(&waiting).await, Some(CommandStatus::Pending));
        assert_eq!(emitter.pending_count().await, 1);
        assert!(!emitter.settle(ids[0], CommandStatus::Acknowledged).await);
    }

    #[tokio::test]
    async fn test_emit_failure_is_recorded_as_failed() {
        // テスト項目: チャンネルが閉じていれば Channel エラーとなり、Failed として記録される
        // given (前提条件):
        let channel = InMemoryEventChannel::new();
        channel.close().await;
        let emitter = emitter(&channel);

        // when (操作):
        let result = emitter
            .send_chat(
                0,
                MessageText::new("hello".to_string()).unwrap(),
                ChatTarget::Room,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::Channel(ChannelError::Closed)));
        assert_eq!(emitter.pending_count().await, 0);
    }
}
