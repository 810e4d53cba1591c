//! クライアントのエラー型

use thiserror::Error;

use crate::{
    domain::{ApiError, ChannelError},
    usecase::{CommandError, LoadRoomError, PasswordError, SyncError},
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// トークンが拒否された
    #[error("Authentication rejected by the game server")]
    Unauthorized,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Load(#[from] LoadRoomError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<ChannelError> for ClientError {
    fn from(error: ChannelError) -> Self {
        match error {
            ChannelError::Unauthorized => ClientError::Unauthorized,
            other => ClientError::Connection(other.to_string()),
        }
    }
}
