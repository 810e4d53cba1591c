//! UseCase: 受信イベントのビューへの適用
//!
//! 1 イベントを 1 回の `dispatch` で適用します。適用は受信順に行われ、
//! 順序の調停はしません。

use std::sync::Arc;

use p42_shared::time::Clock;

use crate::domain::{
    ChatMessage, CommandStatus, CorrelationId, Effect, Nickname, PlayerId, Redirect, RoomView,
    ServerEvent, SessionEnd, SoundCue, Timestamp,
};

/// イベント適用に必要な、ローカルプレイヤーの情報
pub struct DispatchContext {
    pub local_player: PlayerId,
    /// 言及判定に使うニックネーム（自分の改名で更新される）
    pub nickname: Nickname,
    pub clock: Arc<dyn Clock>,
}

impl DispatchContext {
    pub fn new(local_player: PlayerId, nickname: Nickname, clock: Arc<dyn Clock>) -> Self {
        Self {
            local_player,
            nickname,
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// `@nickname` を大文字小文字を区別せずに含むか
    ///
    /// 直後が英数字か `_` の場合は別の名前の一部とみなします（`@al` は `@alice` に一致しない）。
    fn is_mentioned(&self, message: &ChatMessage) -> bool {
        if message.sender_id.as_ref() == Some(&self.local_player) {
            return false;
        }
        let needle = format!("@{}", self.nickname.as_str().to_lowercase());
        let text = message.text.to_lowercase();
        text.match_indices(&needle).any(|(start, _)| {
            text[start + needle.len()..]
                .chars()
                .next()
                .is_none_or(|next| !(next.is_alphanumeric() || next == '_'))
        })
    }
}

/// 1 イベントの適用結果
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// ビューが変更されたか（再描画が必要か）
    pub changed: bool,
    pub effects: Vec<Effect>,
    /// 決着したコマンド
    pub settlement: Option<(CorrelationId, CommandStatus)>,
    /// セッションが終了したか（以降のイベントは適用しない）
    pub session_ended: bool,
}

impl Applied {
    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }
}

/// イベントをビューに適用
pub fn dispatch(view: &mut RoomView, event: ServerEvent, ctx: &mut DispatchContext) -> Applied {
    match event {
        ServerEvent::LobbyUpdate(state) | ServerEvent::GameUpdate(state) => {
            view.replace_state(state);
            Applied::changed()
        }
        ServerEvent::PlayerUpdate(patches) => {
            let count = patches.len();
            let applied = view.patch_players(patches);
            if applied < count {
                tracing::debug!("Ignored {} patches for unknown players", count - applied);
            }
            Applied {
                changed: applied > 0,
                ..Applied::default()
            }
        }
        ServerEvent::PlayerRenamed { id, nickname } => {
            if id == ctx.local_player {
                ctx.nickname = nickname.clone();
            }
            Applied {
                changed: view.rename_player(&id, nickname),
                ..Applied::default()
            }
        }
        ServerEvent::NewMessage(message) | ServerEvent::PrivateNotification(message) => {
            let mut applied = Applied::changed();
            if let Some(sound) = &message.sound {
                applied.effects.push(Effect::PlaySound(SoundCue(sound.clone())));
            } else if ctx.is_mentioned(&message) {
                applied.effects.push(Effect::PlaySound(SoundCue::mention()));
            }
            view.append_message(message);
            applied
        }
        ServerEvent::ServerError {
            message,
            correlation_id,
        } => {
            tracing::warn!("Server error: {}", message);
            view.append_message(ChatMessage::site(message.clone(), ctx.now()));
            Applied {
                changed: true,
                settlement: correlation_id.map(|id| (id, CommandStatus::Failed(message.clone()))),
                effects: vec![Effect::Toast(message)],
                session_ended: false,
            }
        }
        ServerEvent::EnableStart(enabled) => {
            view.can_start_game = enabled;
            Applied::changed()
        }
        ServerEvent::EnableReadyOption(enabled) => {
            view.can_be_ready = enabled;
            Applied::changed()
        }
        ServerEvent::GameStarted => {
            view.mark_started();
            Applied::changed()
        }
        ServerEvent::PhaseChange { phase, code, timer } => {
            view.set_phase(phase, code, timer);
            Applied::changed()
        }
        ServerEvent::GameEnd(outcome) => {
            view.mark_ended(outcome);
            Applied::changed()
        }
        ServerEvent::PremiumUpdate(panel) => {
            view.premium = Some(panel);
            Applied::changed()
        }
        ServerEvent::CommandAck {
            correlation_id,
            ok,
            error,
        } => {
            let status = if ok {
                CommandStatus::Acknowledged
            } else {
                CommandStatus::Failed(error.unwrap_or_else(|| "rejected".to_string()))
            };
            Applied {
                settlement: Some((correlation_id, status)),
                ..Applied::default()
            }
        }
        ServerEvent::GameDissolved { reason } => terminal(SessionEnd::Dissolved, reason),
        ServerEvent::Kicked { reason } => terminal(SessionEnd::Kicked, reason),
    }
}

fn terminal(cause: SessionEnd, reason: Option<String>) -> Applied {
    tracing::info!("Session ended: {:?}", cause);
    Applied {
        effects: vec![Effect::Navigate(Redirect { cause, reason })],
        session_ended: true,
        ..Applied::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        GameOutcome, MessageKind, Phase, PlayerPatch, RoomState, RoomStatus,
        derived::fixtures::{player, room},
    };
    use p42_shared::time::FixedClock;

    fn id(value: &str) -> PlayerId {
        PlayerId::new(value.to_string()).unwrap()
    }

    fn context() -> DispatchContext {
        DispatchContext::new(
            id("alice"),
            Nickname::new("Alice".to_string()).unwrap(),
            Arc::new(FixedClock::new(5_000)),
        )
    }

    fn lobby_view() -> RoomView {
        RoomView::from_parts(
            room("alice", 2),
            vec![player("alice", false), player("bob", false)],
            Vec::new(),
            Vec::new(),
        )
    }

    fn chat(sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            sender_id: Some(id(sender)),
            nickname: sender.to_string(),
            channel: 0,
            text: text.to_string(),
            icon: None,
            sound: None,
            kind: MessageKind::default(),
            sent_at: Timestamp::new(1_000),
        }
    }

    #[test]
    fn test_full_replace_is_last_write_wins() {
        // テスト項目: 全置換イベントは最後に受信したものが残る
        // given (前提条件):
        let mut view = lobby_view();
        let mut ctx = context();
        let first = RoomState {
            room: room("alice", 3),
            players: vec![player("alice", false)],
            viewers: Vec::new(),
        };
        let second = RoomState {
            room: room("alice", 2),
            players: vec![player("alice", false), player("carol", true)],
            viewers: Vec::new(),
        };

        // when (操作):
        dispatch(&mut view, ServerEvent::LobbyUpdate(first), &mut ctx);
        let applied = dispatch(&mut view, ServerEvent::GameUpdate(second), &mut ctx);

        // then (期待する結果):
        assert!(applied.changed);
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.room.as_ref().unwrap().max_players, 2);
        assert!(view.can_start_game);
    }

    #[test]
    fn test_patch_for_unknown_player_leaves_view_unchanged() {
        // テスト項目: 未知のプレイヤーへのパッチは変更扱いにならない
        // given (前提条件):
        let mut view = lobby_view();
        let before = view.clone();
        let mut patch = PlayerPatch::empty(id("mallory"));
        patch.ready = Some(true);

        // when (操作):
        let applied = dispatch(&mut view, ServerEvent::PlayerUpdate(vec![patch]), &mut context());

        // then (期待する結果):
        assert!(!applied.changed);
        assert_eq!(view, before);
    }

    #[test]
    fn test_message_with_sound_plays_that_sound() {
        // テスト項目: sound 付きメッセージはそのサウンドを再生する
        // given (前提条件):
        let mut view = lobby_view();
        let mut message = chat("bob", "hello");
        message.sound = Some("wolf".to_string());

        // when (操作):
        let applied = dispatch(&mut view, ServerEvent::NewMessage(message), &mut context());

        // then (期待する結果):
        assert_eq!(applied.effects, vec![Effect::PlaySound(SoundCue("wolf".to_string()))]);
        assert_eq!(view.messages.len(), 1);
    }

    #[test]
    fn test_mention_of_local_nickname_plays_mention_sound() {
        // テスト項目: 自分のニックネームへの言及で言及サウンドが鳴る（大文字小文字は区別しない）
        // given (前提条件):
        let mut view = lobby_view();
        let mut ctx = context();

        // when (操作):
        let mentioned = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "vote for @alice now")),
            &mut ctx,
        );
        let own = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("alice", "I am @Alice")),
            &mut ctx,
        );
        let plain = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "alice without at sign")),
            &mut ctx,
        );

        // then (期待する結果):
        assert_eq!(mentioned.effects, vec![Effect::PlaySound(SoundCue::mention())]);
        assert!(own.effects.is_empty());
        assert!(plain.effects.is_empty());
        assert_eq!(view.messages.len(), 3);
    }

    #[test]
    fn test_mention_requires_whole_nickname() {
        // テスト項目: 自分の名前で始まる別の名前への言及では鳴らない
        // given (前提条件): ニックネームが "Al"
        let mut view = lobby_view();
        let mut ctx = DispatchContext::new(
            id("al"),
            Nickname::new("Al".to_string()).unwrap(),
            Arc::new(FixedClock::new(5_000)),
        );

        // when (操作):
        let other = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "@alice vote bob")),
            &mut ctx,
        );
        let underscore = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "@al_2 hi")),
            &mut ctx,
        );
        let own = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "@alice and @Al, vote bob")),
            &mut ctx,
        );
        let at_end = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "wake up @AL")),
            &mut ctx,
        );

        // then (期待する結果):
        assert!(other.effects.is_empty());
        assert!(underscore.effects.is_empty());
        assert_eq!(own.effects, vec![Effect::PlaySound(SoundCue::mention())]);
        assert_eq!(at_end.effects, vec![Effect::PlaySound(SoundCue::mention())]);
    }

    #[test]
    fn test_local_rename_updates_mention_nickname() {
        // テスト項目: 自分の改名後は新しいニックネームで言及判定する
        // given (前提条件):
        let mut view = lobby_view();
        let mut ctx = context();

        // when (操作):
        let applied = dispatch(
            &mut view,
            ServerEvent::PlayerRenamed {
                id: id("alice"),
                nickname: Nickname::new("Wolfie".to_string()).unwrap(),
            },
            &mut ctx,
        );
        let mentioned = dispatch(
            &mut view,
            ServerEvent::NewMessage(chat("bob", "@wolfie hi")),
            &mut ctx,
        );

        // then (期待する結果):
        assert!(applied.changed);
        assert_eq!(view.player(&id("alice")).unwrap().nickname.as_str(), "Wolfie");
        assert_eq!(ctx.nickname.as_str(), "Wolfie");
        assert_eq!(mentioned.effects, vec![Effect::PlaySound(SoundCue::mention())]);
    }

    #[test]
    fn test_server_error_appends_site_message_and_fails_command() {
        // テスト項目: サーバーエラーはサイトメッセージとして追加され、対応コマンドを失敗にする
        // given (前提条件):
        let mut view = lobby_view();
        let correlation_id = CorrelationId::generate();

        // when (操作):
        let applied = dispatch(
            &mut view,
            ServerEvent::ServerError {
                message: "room is full".to_string(),
                correlation_id: Some(correlation_id),
            },
            &mut context(),
        );

        // then (期待する結果):
        assert_eq!(applied.effects, vec![Effect::Toast("room is full".to_string())]);
        assert_eq!(
            applied.settlement,
            Some((correlation_id, CommandStatus::Failed("room is full".to_string())))
        );
        let message = view.messages.last().unwrap();
        assert!(message.kind.site);
        assert_eq!(message.sent_at, Timestamp::new(5_000));
    }

    #[test]
    fn test_server_enable_signal_overrides_local_flag() {
        // テスト項目: サーバーの開始可能シグナルがそのままフラグに反映される
        // given (前提条件):
        let mut view = lobby_view();
        assert!(!view.can_start_game);

        // when (操作):
        dispatch(&mut view, ServerEvent::EnableStart(true), &mut context());
        dispatch(&mut view, ServerEvent::EnableReadyOption(false), &mut context());

        // then (期待する結果):
        assert!(view.can_start_game);
        assert!(!view.can_be_ready);
    }

    #[test]
    fn test_game_lifecycle_flags() {
        // テスト項目: 開始・フェーズ変更・終了がビューのフラグに反映される
        // given (前提条件):
        let mut view = lobby_view();
        let mut ctx = context();

        // when (操作):
        dispatch(&mut view, ServerEvent::GameStarted, &mut ctx);
        dispatch(
            &mut view,
            ServerEvent::PhaseChange {
                phase: Phase::NightSeer,
                code: Some(2),
                timer: Some(30),
            },
            &mut ctx,
        );

        // then (期待する結果):
        assert!(view.game_started);
        assert!(view.is_night);
        assert_eq!(view.timer, Some(30));

        // when (操作):
        dispatch(
            &mut view,
            ServerEvent::GameEnd(GameOutcome {
                winning_camp: "villagers".to_string(),
                message: None,
            }),
            &mut ctx,
        );

        // then (期待する結果):
        assert_eq!(view.room.as_ref().unwrap().status, RoomStatus::Completed);
        assert_eq!(view.outcome.as_ref().unwrap().winning_camp, "villagers");
    }

    #[test]
    fn test_command_ack_settles_without_changing_view() {
        // テスト項目: commandAck はビューを変更せずにコマンドを決着させる
        // given (前提条件):
        let mut view = lobby_view();
        let before = view.clone();
        let ok_id = CorrelationId::generate();
        let ng_id = CorrelationId::generate();

        // when (操作):
        let ok = dispatch(
            &mut view,
            ServerEvent::CommandAck {
                correlation_id: ok_id,
                ok: true,
                error: None,
            },
            &mut context(),
        );
        let ng = dispatch(
            &mut view,
            ServerEvent::CommandAck {
                correlation_id: ng_id,
                ok: false,
                error: Some("muted".to_string()),
            },
            &mut context(),
        );

        // then (期待する結果):
        assert!(!ok.changed);
        assert_eq!(ok.settlement, Some((ok_id, CommandStatus::Acknowledged)));
        assert_eq!(
            ng.settlement,
            Some((ng_id, CommandStatus::Failed("muted".to_string())))
        );
        assert_eq!(view, before);
    }

    #[test]
    fn test_terminal_event_emits_single_navigate_without_mutation() {
        // テスト項目: 終了イベントは 1 回だけ遷移を依頼し、ビューを変更しない
        // given (前提条件):
        let mut view = lobby_view();
        let before = view.clone();

        // when (操作):
        let applied = dispatch(
            &mut view,
            ServerEvent::Kicked {
                reason: Some("spam".to_string()),
            },
            &mut context(),
        );

        // then (期待する結果):
        assert!(applied.session_ended);
        assert!(!applied.changed);
        assert_eq!(
            applied.effects,
            vec![Effect::Navigate(Redirect {
                cause: SessionEnd::Kicked,
                reason: Some("spam".to_string()),
            })]
        );
        assert_eq!(view, before);
    }
}
