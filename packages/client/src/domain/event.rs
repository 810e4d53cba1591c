//! イベント型
//!
//! - `ServerEvent`: サーバーから push されるイベント（1 イベント名につき 1 バリアント）
//! - `ClientCommand`: クライアントから送信する意図（コマンド）
//! - `Effect`: イベント適用の結果として UI に依頼する副作用

use super::{
    entity::{ChatMessage, GameOutcome, PlayerPatch, PremiumPanel, RoomState},
    phase::Phase,
    value_object::{CorrelationId, MessageText, Nickname, PlayerId, RoomId},
};

/// Every inbound event name the room view subscribes to.
pub const INBOUND_EVENTS: [&str; 16] = [
    "lobbyUpdate",
    "gameUpdate",
    "enableStart",
    "enableReadyOption",
    "newMessage",
    "privateNotification",
    "error",
    "gameStarted",
    "phaseChange",
    "gameEnd",
    "playerUpdate",
    "playerRenamed",
    "premiumUpdate",
    "gameDissolved",
    "kicked",
    "commandAck",
];

/// サーバーから push されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// ロビー状態の全置換
    LobbyUpdate(RoomState),
    /// ゲーム状態の全置換
    GameUpdate(RoomState),
    /// サーバーによる「開始可能」シグナル
    EnableStart(bool),
    /// サーバーによる「準備完了可能」シグナル
    EnableReadyOption(bool),
    NewMessage(ChatMessage),
    PrivateNotification(ChatMessage),
    ServerError {
        message: String,
        correlation_id: Option<CorrelationId>,
    },
    GameStarted,
    PhaseChange {
        phase: Phase,
        code: Option<i32>,
        timer: Option<u32>,
    },
    GameEnd(GameOutcome),
    PlayerUpdate(Vec<PlayerPatch>),
    PlayerRenamed {
        id: PlayerId,
        nickname: Nickname,
    },
    PremiumUpdate(PremiumPanel),
    /// ルーム解散（セッション終了）
    GameDissolved {
        reason: Option<String>,
    },
    /// キック（セッション終了）
    Kicked {
        reason: Option<String>,
    },
    CommandAck {
        correlation_id: CorrelationId,
        ok: bool,
        error: Option<String>,
    },
}

impl ServerEvent {
    /// 通信上のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::LobbyUpdate(_) => "lobbyUpdate",
            ServerEvent::GameUpdate(_) => "gameUpdate",
            ServerEvent::EnableStart(_) => "enableStart",
            ServerEvent::EnableReadyOption(_) => "enableReadyOption",
            ServerEvent::NewMessage(_) => "newMessage",
            ServerEvent::PrivateNotification(_) => "privateNotification",
            ServerEvent::ServerError { .. } => "error",
            ServerEvent::GameStarted => "gameStarted",
            ServerEvent::PhaseChange { .. } => "phaseChange",
            ServerEvent::GameEnd(_) => "gameEnd",
            ServerEvent::PlayerUpdate(_) => "playerUpdate",
            ServerEvent::PlayerRenamed { .. } => "playerRenamed",
            ServerEvent::PremiumUpdate(_) => "premiumUpdate",
            ServerEvent::GameDissolved { .. } => "gameDissolved",
            ServerEvent::Kicked { .. } => "kicked",
            ServerEvent::CommandAck { .. } => "commandAck",
        }
    }
}

/// モデレーション操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Kick,
    Mute,
    Unmute,
    Ban,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Kick => "kick",
            ModerationAction::Mute => "mute",
            ModerationAction::Unmute => "unmute",
            ModerationAction::Ban => "ban",
        }
    }
}

/// チャットの宛先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    /// ルームのチャンネル
    Room,
    /// 特定プレイヤーへの個人メッセージ
    Private(PlayerId),
    /// ギルドチャット
    Guild,
}

/// クライアントから送信するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    JoinRoom {
        room_id: RoomId,
        password: Option<String>,
    },
    SyncGame {
        room_id: RoomId,
    },
    Moderation {
        room_id: RoomId,
        target: PlayerId,
        action: ModerationAction,
    },
    ThrowItem {
        room_id: RoomId,
        item: String,
        target: PlayerId,
    },
    SendMessage {
        room_id: RoomId,
        channel: u32,
        text: MessageText,
        target: ChatTarget,
    },
    Rename {
        room_id: RoomId,
        nickname: Nickname,
    },
}

impl ClientCommand {
    /// 通信上のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            ClientCommand::JoinRoom { .. } => "joinRoom",
            ClientCommand::SyncGame { .. } => "syncGame",
            ClientCommand::Moderation { .. } => "moderationCommand",
            ClientCommand::ThrowItem { .. } => "throwItem",
            ClientCommand::SendMessage { .. } => "sendMessage",
            ClientCommand::Rename { .. } => "rename",
        }
    }
}

/// 送信コマンドの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Pending,
    Acknowledged,
    Failed(String),
}

/// セッション終了の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Dissolved,
    Kicked,
}

/// 画面遷移の依頼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub cause: SessionEnd,
    pub reason: Option<String>,
}

/// 再生するサウンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCue(pub String);

impl SoundCue {
    /// 自分のニックネームが言及されたときのサウンド
    pub fn mention() -> Self {
        Self("mention".to_string())
    }
}

/// UI に依頼する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PlaySound(SoundCue),
    Navigate(Redirect),
    Toast(String),
}
