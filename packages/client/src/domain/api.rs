//! REST API trait 定義
//!
//! ゲームサーバーの HTTP API へのインターフェース。
//! 認証トークンの付与は実装側が行います。

use async_trait::async_trait;

use super::{
    entity::{CardAllocation, ChatMessage, PlayerRecord, RoomSnapshot, ViewerRecord},
    error::ApiError,
    value_object::RoomId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameApi: Send + Sync {
    /// ルーム詳細を取得
    async fn get_room(&self, room_id: &RoomId) -> Result<RoomSnapshot, ApiError>;

    /// プレイヤー一覧を取得
    async fn get_players(&self, room_id: &RoomId) -> Result<Vec<PlayerRecord>, ApiError>;

    /// 観戦者一覧を取得
    async fn get_viewers(&self, room_id: &RoomId) -> Result<Vec<ViewerRecord>, ApiError>;

    /// チャット履歴を取得
    async fn get_chat_history(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, ApiError>;

    async fn join_room(&self, room_id: &RoomId) -> Result<(), ApiError>;

    async fn leave_room(&self, room_id: &RoomId) -> Result<(), ApiError>;

    async fn set_ready(&self, room_id: &RoomId, ready: bool) -> Result<(), ApiError>;

    async fn start_game(&self, room_id: &RoomId) -> Result<(), ApiError>;

    /// ルームパスワードを検証（正しければ `true`）
    async fn check_password(&self, room_id: &RoomId, password: &str) -> Result<bool, ApiError>;

    /// 役職カード構成を更新
    async fn update_cards(
        &self,
        room_id: &RoomId,
        cards: &[CardAllocation],
    ) -> Result<(), ApiError>;

    /// 議論タイマーの長さ（秒）を更新
    async fn update_timer(&self, room_id: &RoomId, debate_time: u32) -> Result<(), ApiError>;
}
