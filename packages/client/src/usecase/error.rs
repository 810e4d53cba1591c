//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ApiError, ChannelError, ProtocolError};

/// コマンド送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Failed to encode command: {0}")]
    Encode(#[from] ProtocolError),

    #[error("Failed to emit command: {0}")]
    Channel(#[from] ChannelError),
}

/// ルーム画面マウントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Failed to join room: {0}")]
    Join(#[from] CommandError),
}

/// ルーム初期状態取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadRoomError {
    #[error("Failed to load room: {0}")]
    Room(#[from] ApiError),
}

/// パスワード検証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("This room requires a password")]
    PasswordRequired,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Failed to check password: {0}")]
    Api(#[from] ApiError),
}
