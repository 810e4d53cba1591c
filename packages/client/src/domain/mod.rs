//! ドメイン層
//!
//! ルーム同期クライアントが扱う値オブジェクト・エンティティ・イベント型と、
//! 外部協調者（ソケット、REST API、ローカル保存）へのインターフェース（port）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod api;
pub mod channel;
pub mod derived;
pub mod entity;
pub mod error;
pub mod event;
pub mod password;
pub mod phase;
pub mod value_object;
pub mod view;

pub use api::GameApi;
pub use channel::{EventChannel, InboundFrame, ListenerChannel, ListenerId, OutboundFrame};
pub use entity::{
    CardAllocation, ChatMessage, GameOutcome, MessageKind, PlayerPatch, PlayerRecord,
    PremiumPanel, RoomSnapshot, RoomState, RoomStatus, ViewerRecord,
};
pub use error::{ApiError, ChannelError, ProtocolError, StoreError, ValueObjectError};
pub use event::{
    ChatTarget, ClientCommand, CommandStatus, Effect, INBOUND_EVENTS, ModerationAction, Redirect,
    ServerEvent, SessionEnd, SoundCue,
};
pub use password::PasswordMemory;
pub use phase::{Phase, TimeOfDay};
pub use value_object::{CardId, CorrelationId, MessageText, Nickname, PlayerId, RoomId, Timestamp};
pub use view::RoomView;
