//! エンティティ
//!
//! サーバーから受け取ったルーム・プレイヤー・チャットの状態を表します。
//! いずれもクライアント側では検証済みのコピーであり、正はサーバー側にあります。

use super::value_object::{CardId, Nickname, PlayerId, RoomId, Timestamp};

/// ルームのライフサイクル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Completed,
}

/// 役職カードの割り当て（カード種別と枚数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAllocation {
    pub card: CardId,
    pub quantity: u32,
}

/// 1 ルームの最新スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    /// 数値のゲーム種別タグ
    pub game_type: u32,
    /// 議論タイマーの長さ（秒）
    pub debate_time: u32,
    pub max_players: u32,
    pub is_private: bool,
    pub password: Option<String>,
    /// サーバーが管理する生のフェーズコード
    pub phase: i32,
    pub white_flag: bool,
    pub anonymous_game: bool,
    /// 順序付きの役職カード割り当て
    pub cards: Vec<CardAllocation>,
    /// ルーム作成者（準備完了チェックの対象外）
    pub creator: PlayerId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// プレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub nickname: Nickname,
    pub alive: bool,
    pub ready: bool,
    pub in_love: bool,
    pub charmed: bool,
    pub infected: bool,
    pub card: Option<CardId>,
}

impl PlayerRecord {
    /// 新規参加直後の状態（生存・未準備・役職なし）でプレイヤーを作成
    pub fn new(id: PlayerId, nickname: Nickname) -> Self {
        Self {
            id,
            nickname,
            alive: true,
            ready: false,
            in_love: false,
            charmed: false,
            infected: false,
            card: None,
        }
    }

    /// 部分更新を適用（`Some` のフィールドのみ上書き）
    pub fn merge(&mut self, patch: PlayerPatch) {
        if let Some(nickname) = patch.nickname {
            self.nickname = nickname;
        }
        if let Some(alive) = patch.alive {
            self.alive = alive;
        }
        if let Some(ready) = patch.ready {
            self.ready = ready;
        }
        if let Some(in_love) = patch.in_love {
            self.in_love = in_love;
        }
        if let Some(charmed) = patch.charmed {
            self.charmed = charmed;
        }
        if let Some(infected) = patch.infected {
            self.infected = infected;
        }
        if let Some(card) = patch.card {
            self.card = Some(card);
        }
    }
}

/// プレイヤーの部分更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPatch {
    pub id: PlayerId,
    pub nickname: Option<Nickname>,
    pub alive: Option<bool>,
    pub ready: Option<bool>,
    pub in_love: Option<bool>,
    pub charmed: Option<bool>,
    pub infected: Option<bool>,
    pub card: Option<CardId>,
}

impl PlayerPatch {
    /// 何も変更しないパッチ
    pub fn empty(id: PlayerId) -> Self {
        Self {
            id,
            nickname: None,
            alive: None,
            ready: None,
            in_love: None,
            charmed: None,
            infected: None,
            card: None,
        }
    }
}

/// 観戦者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerRecord {
    pub id: PlayerId,
    pub nickname: Nickname,
}

/// チャットメッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageKind {
    /// 村長（リーダー）のみが見られるメッセージ
    pub leader_only: bool,
    /// 自分宛ての個人通知
    pub personal: bool,
    /// サイト（システム）からのメッセージ
    pub site: bool,
}

/// チャットメッセージ（追記のみ、挿入後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: Option<PlayerId>,
    /// 表示名（システムメッセージでは空文字）
    pub nickname: String,
    pub channel: u32,
    pub text: String,
    pub icon: Option<String>,
    pub sound: Option<String>,
    pub kind: MessageKind,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    /// 送信者のいないサイトメッセージを作成
    pub fn site(text: String, sent_at: Timestamp) -> Self {
        Self {
            sender_id: None,
            nickname: String::new(),
            channel: 0,
            text,
            icon: None,
            sound: None,
            kind: MessageKind {
                site: true,
                ..MessageKind::default()
            },
            sent_at,
        }
    }
}

/// ロビー／ゲーム状態の全置換ペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub room: RoomSnapshot,
    pub players: Vec<PlayerRecord>,
    pub viewers: Vec<ViewerRecord>,
}

/// ゲーム終了時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// 勝利陣営
    pub winning_camp: String,
    pub message: Option<String>,
}

/// プレミアムパネルの状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PremiumPanel {
    pub active: bool,
    /// 投げられるアイテムの一覧
    pub throwable_items: Vec<String>,
}
