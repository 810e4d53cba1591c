//! クライアント設定

use std::path::PathBuf;

use crate::domain::{Nickname, PlayerId, RoomId};

use super::reconnect::ReconnectPolicy;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// イベントチャンネルの WebSocket URL
    pub ws_url: String,
    /// REST API のベース URL
    pub api_url: String,
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub nickname: Nickname,
    /// Bearer トークン（WebSocket ではクエリパラメータで送る）
    pub token: Option<String>,
    /// 非公開ルームのパスワード
    pub password: Option<String>,
    /// パスワード入力済みフラグの保存先
    pub password_store: PathBuf,
    pub reconnect: ReconnectPolicy,
}
