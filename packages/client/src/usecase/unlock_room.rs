//! UseCase: パスワード付きルームの解錠
//!
//! 一度正しいパスワードを入力したルームは `PasswordMemory` に記録され、
//! 以降はパスワードを求めません。記録の読み書きに失敗しても致命的ではないため、
//! ログを出して続行します。

use std::sync::Arc;

use crate::domain::{GameApi, PasswordMemory, RoomSnapshot};

use super::error::PasswordError;

/// 解錠の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    /// 公開ルーム
    NotRequired,
    /// 以前に入力済み
    Remembered,
    /// 今回の入力で検証された
    Verified,
}

pub struct UnlockRoomUseCase {
    api: Arc<dyn GameApi>,
    memory: Arc<dyn PasswordMemory>,
}

impl UnlockRoomUseCase {
    pub fn new(api: Arc<dyn GameApi>, memory: Arc<dyn PasswordMemory>) -> Self {
        Self { api, memory }
    }

    /// # Errors
    ///
    /// * `PasswordError::PasswordRequired` - 非公開ルームで、未入力かつ記録もない
    /// * `PasswordError::WrongPassword` - パスワードが正しくない
    /// * `PasswordError::Api` - 検証 API の呼び出しに失敗
    pub async fn execute(
        &self,
        room: &RoomSnapshot,
        password: Option<&str>,
    ) -> Result<Unlock, PasswordError> {
        if !room.is_private {
            return Ok(Unlock::NotRequired);
        }

        match self.memory.is_unlocked(&room.id).await {
            Ok(true) => return Ok(Unlock::Remembered),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to read password memory: {}", e),
        }

        let password = password.ok_or(PasswordError::PasswordRequired)?;
        if !self.api.check_password(&room.id, password).await? {
            tracing::info!("Wrong password for room {}", room.id);
            return Err(PasswordError::WrongPassword);
        }

        if let Err(e) = self.memory.remember(&room.id).await {
            tracing::warn!("Failed to remember room {}: {}", room.id, e);
        }
        Ok(Unlock::Verified)
    }
}
