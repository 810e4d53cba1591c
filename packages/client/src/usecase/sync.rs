//! UseCase: ルーム画面の同期（マウント〜アンマウント）
//!
//! ## 処理の流れ
//!
//! 1. 受信イベント名ごとにリスナーを 1 つ登録する
//! 2. 適用ループを起動し、`joinRoom` を送信する
//! 3. 適用ループは受信順にイベントを適用し、ビューを `watch` で、
//!    副作用を mpsc で公開する
//! 4. `unmount()` か終了イベントで、登録したリスナーをすべて解除する
//!
//! リスナー解除後は送信側がすべて破棄されるため、適用ループは自然に終了します。

use std::sync::Arc;

use p42_shared::time::Clock;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    domain::{
        Effect, EventChannel, INBOUND_EVENTS, InboundFrame, ListenerId, Nickname, PlayerId,
        RoomId, RoomView, Timestamp,
    },
    infrastructure::dto::conversion::decode_event,
};

use super::{
    command::CommandEmitter,
    dispatcher::{DispatchContext, dispatch},
    error::SyncError,
};

/// マウント時のパラメータ
#[derive(Debug, Clone)]
pub struct MountParams {
    pub room_id: RoomId,
    pub local_player: PlayerId,
    pub nickname: Nickname,
    /// `joinRoom` に添えるパスワード（非公開ルーム）
    pub password: Option<String>,
}

/// マウント中のルーム画面
pub struct RoomSync {
    channel: Arc<dyn EventChannel>,
    listener_ids: Vec<ListenerId>,
    view: watch::Receiver<RoomView>,
    commands: CommandEmitter,
    task: JoinHandle<()>,
}

impl RoomSync {
    /// リスナーを登録して `joinRoom` を送信し、適用ループを起動する
    ///
    /// 副作用（サウンド・遷移・トースト）の受信側を合わせて返します。
    ///
    /// # Errors
    ///
    /// * `SyncError::Join` - `joinRoom` を送信できない（登録したリスナーは解除済み）
    pub async fn mount(
        channel: Arc<dyn EventChannel>,
        params: MountParams,
        initial: RoomView,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Effect>), SyncError> {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let mut listener_ids = Vec::with_capacity(INBOUND_EVENTS.len());
        for event in INBOUND_EVENTS {
            listener_ids.push(channel.on(event, frame_tx.clone()).await);
        }
        // 送信側はチャンネルのリスナーだけが持つ
        drop(frame_tx);

        let commands = CommandEmitter::new(channel.clone(), params.room_id.clone(), clock.clone());
        let (view_tx, view) = watch::channel(initial);
        let (effects_tx, effects_rx) = mpsc::unbounded_channel();
        let ctx = DispatchContext::new(params.local_player, params.nickname, clock);

        let task = tokio::spawn(apply_loop(
            frame_rx,
            view_tx,
            effects_tx,
            commands.clone(),
            ctx,
            channel.clone(),
            listener_ids.clone(),
        ));

        if let Err(e) = commands.join(params.password).await {
            tracing::warn!("Failed to join room {}: {}", params.room_id, e);
            detach(channel.as_ref(), &listener_ids).await;
            if let Err(e) = task.await {
                tracing::warn!("Apply loop panicked: {}", e);
            }
            return Err(SyncError::Join(e));
        }
        tracing::info!("Mounted room {}", params.room_id);

        Ok((
            Self {
                channel,
                listener_ids,
                view,
                commands,
                task,
            },
            effects_rx,
        ))
    }

    /// 最新のビューを購読する
    pub fn view(&self) -> watch::Receiver<RoomView> {
        self.view.clone()
    }

    pub fn commands(&self) -> &CommandEmitter {
        &self.commands
    }

    /// 適用ループが終了したか（終了イベントまたは切断）
    pub fn is_ended(&self) -> bool {
        self.task.is_finished()
    }

    /// 登録したリスナーをすべて解除し、適用ループの終了を待つ
    pub async fn unmount(self) {
        detach(self.channel.as_ref(), &self.listener_ids).await;
        if let Err(e) = self.task.await {
            tracing::warn!("Apply loop panicked: {}", e);
        }
        tracing::info!("Unmounted room {}", self.commands.room_id());
    }
}

async fn detach(channel: &dyn EventChannel, listener_ids: &[ListenerId]) {
    for id in listener_ids {
        channel.off(*id).await;
    }
}

async fn apply_loop(
    mut frames: mpsc::UnboundedReceiver<InboundFrame>,
    view_tx: watch::Sender<RoomView>,
    effects_tx: mpsc::UnboundedSender<Effect>,
    commands: CommandEmitter,
    mut ctx: DispatchContext,
    channel: Arc<dyn EventChannel>,
    listener_ids: Vec<ListenerId>,
) {
    while let Some(frame) = frames.recv().await {
        let received_at = Timestamp::new(ctx.clock.now_millis());
        let event = match decode_event(frame, received_at) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Dropping inbound event: {}", e);
                continue;
            }
        };
        tracing::debug!("Applying '{}'", event.name());

        let mut applied = None;
        view_tx.send_if_modified(|view| {
            let result = dispatch(view, event, &mut ctx);
            let changed = result.changed;
            applied = Some(result);
            changed
        });
        let Some(applied) = applied else {
            continue;
        };

        if let Some((correlation_id, status)) = applied.settlement {
            commands.settle(correlation_id, status).await;
        }
        for effect in applied.effects {
            if effects_tx.send(effect).is_err() {
                tracing::debug!("Effect receiver dropped");
            }
        }
        if applied.session_ended {
            detach(channel.as_ref(), &listener_ids).await;
            break;
        }
    }
    tracing::debug!("Apply loop finished");
}
