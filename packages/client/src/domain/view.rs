//! ルームビュー（スナップショットストア）
//!
//! マウント中の 1 画面が保持する、1 ルームの最新状態。
//! 受信イベントの適用によってのみ変更されます。

use super::{
    derived,
    entity::{
        ChatMessage, GameOutcome, PlayerPatch, PlayerRecord, PremiumPanel, RoomSnapshot,
        RoomState, RoomStatus, ViewerRecord,
    },
    phase::Phase,
    value_object::{Nickname, PlayerId},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomView {
    pub room: Option<RoomSnapshot>,
    pub players: Vec<PlayerRecord>,
    pub viewers: Vec<ViewerRecord>,
    pub messages: Vec<ChatMessage>,
    pub can_start_game: bool,
    pub can_be_ready: bool,
    pub is_night: bool,
    pub game_started: bool,
    pub outcome: Option<GameOutcome>,
    pub phase: Option<Phase>,
    /// 現在フェーズの残り時間（秒）
    pub timer: Option<u32>,
    pub premium: Option<PremiumPanel>,
}

impl RoomView {
    /// REST で取得した初期状態からビューを作成
    pub fn from_parts(
        room: RoomSnapshot,
        players: Vec<PlayerRecord>,
        viewers: Vec<ViewerRecord>,
        messages: Vec<ChatMessage>,
    ) -> Self {
        let mut view = Self {
            game_started: room.status != RoomStatus::Waiting,
            room: Some(room),
            players,
            viewers,
            messages,
            ..Self::default()
        };
        view.recompute_derived();
        view
    }

    /// ルーム・プレイヤー・観戦者を全置換（後勝ち）
    pub fn replace_state(&mut self, state: RoomState) {
        self.room = Some(state.room);
        self.players = state.players;
        self.viewers = state.viewers;
        self.recompute_derived();
    }

    /// プレイヤーの部分更新を適用
    ///
    /// 既存のプレイヤーにのみ適用し、未知の ID は無視します（挿入しない）。
    /// 適用できたパッチの数を返します。
    pub fn patch_players(&mut self, patches: Vec<PlayerPatch>) -> usize {
        let mut applied = 0;
        for patch in patches {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == patch.id) {
                player.merge(patch);
                applied += 1;
            }
        }
        if applied > 0 {
            self.recompute_derived();
        }
        applied
    }

    /// プレイヤー名の変更（未知の ID は無視）
    pub fn rename_player(&mut self, id: &PlayerId, nickname: Nickname) -> bool {
        let mut patch = PlayerPatch::empty(id.clone());
        patch.nickname = Some(nickname);
        self.patch_players(vec![patch]) > 0
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// フェーズ変更を反映（夜判定はフェーズからのみ導出）
    pub fn set_phase(&mut self, phase: Phase, code: Option<i32>, timer: Option<u32>) {
        self.phase = Some(phase);
        self.is_night = derived::is_night(self.phase.as_ref());
        if let Some(timer) = timer {
            self.timer = Some(timer);
        }
        if let (Some(code), Some(room)) = (code, self.room.as_mut()) {
            room.phase = code;
        }
    }

    pub fn mark_started(&mut self) {
        self.game_started = true;
        if let Some(room) = self.room.as_mut() {
            room.status = RoomStatus::InProgress;
        }
        self.recompute_derived();
    }

    pub fn mark_ended(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
        if let Some(room) = self.room.as_mut() {
            room.status = RoomStatus::Completed;
        }
        self.recompute_derived();
    }

    /// 派生フラグを再計算
    pub fn recompute_derived(&mut self) {
        match &self.room {
            Some(room) => {
                self.can_start_game = derived::can_start_game(room, &self.players);
                self.can_be_ready = derived::can_be_ready(room, &self.players);
            }
            None => {
                self.can_start_game = false;
                self.can_be_ready = false;
            }
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::derived::fixtures::{player, room};

    fn view_with(players: Vec<PlayerRecord>, max_players: u32) -> RoomView {
        RoomView::from_parts(room("alice", max_players), players, Vec::new(), Vec::new())
    }

    #[test]
    fn test_patch_never_inserts_unknown_player() {
        // テスト項目: 未知のプレイヤーへのパッチは無視され、挿入されない
        // given (前提条件):
        let mut view = view_with(vec![player("alice", false)], 2);
        let mut patch = PlayerPatch::empty(PlayerId::new("mallory".to_string()).unwrap());
        patch.ready = Some(true);

        // when (操作):
        let applied = view.patch_players(vec![patch]);

        // then (期待する結果):
        assert_eq!(applied, 0);
        assert_eq!(view.players.len(), 1);
        assert!(view.player(&PlayerId::new("mallory".to_string()).unwrap()).is_none());
    }

    #[test]
    fn test_patch_recomputes_can_start_game() {
        // テスト項目: パッチ適用後に開始可能フラグが再計算される
        // given (前提条件):
        let mut view = view_with(vec![player("alice", false), player("bob", false)], 2);
        assert!(!view.can_start_game);
        let mut patch = PlayerPatch::empty(PlayerId::new("bob".to_string()).unwrap());
        patch.ready = Some(true);

        // when (操作):
        view.patch_players(vec![patch]);

        // then (期待する結果):
        assert!(view.can_start_game);
    }

    #[test]
    fn test_set_phase_updates_night_flag_and_code() {
        // テスト項目: フェーズ変更で夜フラグ・タイマー・フェーズコードが更新される
        // given (前提条件):
        let mut view = view_with(vec![player("alice", false)], 2);

        // when (操作):
        view.set_phase(Phase::NightWerewolves, Some(3), Some(45));

        // then (期待する結果):
        assert!(view.is_night);
        assert_eq!(view.timer, Some(45));
        assert_eq!(view.room.as_ref().unwrap().phase, 3);

        // when (操作): 昼に戻る（タイマー指定なし）
        view.set_phase(Phase::DayDiscussion, None, None);

        // then (期待する結果):
        assert!(!view.is_night);
        assert_eq!(view.timer, Some(45));
    }

    #[test]
    fn test_mark_started_disables_ready_option() {
        // テスト項目: ゲーム開始後は準備完了オプションが無効になる
        // given (前提条件):
        let mut view = view_with(vec![player("alice", false), player("bob", false)], 2);
        assert!(view.can_be_ready);

        // when (操作):
        view.mark_started();

        // then (期待する結果):
        assert!(view.game_started);
        assert!(!view.can_be_ready);
        assert_eq!(view.room.as_ref().unwrap().status, RoomStatus::InProgress);
    }
}
