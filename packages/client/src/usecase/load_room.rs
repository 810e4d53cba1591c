//! UseCase: ルーム画面の初期状態取得
//!
//! ルーム詳細・プレイヤー・観戦者・チャット履歴を並行して取得します。
//! ルーム詳細が取れなければ画面を開けませんが、一覧の取得失敗は空のまま続行します
//! （直後の `lobbyUpdate` / `gameUpdate` で埋まるため）。

use std::sync::Arc;

use crate::domain::{ApiError, GameApi, RoomId, RoomView};

use super::error::LoadRoomError;

pub struct LoadRoomUseCase {
    api: Arc<dyn GameApi>,
}

impl LoadRoomUseCase {
    pub fn new(api: Arc<dyn GameApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// * `LoadRoomError::Room` - ルーム詳細を取得できない
    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomView, LoadRoomError> {
        let (room, players, viewers, history) = tokio::join!(
            self.api.get_room(room_id),
            self.api.get_players(room_id),
            self.api.get_viewers(room_id),
            self.api.get_chat_history(room_id),
        );

        let room = room?;
        let players = or_empty("players", players);
        let viewers = or_empty("viewers", viewers);
        let history = or_empty("chat history", history);
        tracing::info!(
            "Loaded room {} ({} players, {} viewers, {} messages)",
            room_id,
            players.len(),
            viewers.len(),
            history.len()
        );

        Ok(RoomView::from_parts(room, players, viewers, history))
    }
}

fn or_empty<T>(what: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch {}: {}", what, e);
        Vec::new()
    })
}
