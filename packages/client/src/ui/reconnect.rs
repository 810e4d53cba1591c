//! 再接続の判定（副作用のない関数）

use std::time::Duration;

use crate::{
    domain::ApiError,
    usecase::{LoadRoomError, PasswordError},
};

use super::error::ClientError;

/// 指数バックオフによる再接続方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// 待ち時間の上限
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// 再接続すべきか
    ///
    /// * `current_attempt` - これまでの再接続回数（0 始まり）
    pub fn should_attempt_reconnect(&self, error: &ClientError, current_attempt: u32) -> bool {
        if should_exit_immediately(error) {
            return false;
        }
        current_attempt < self.max_attempts
    }

    /// `attempt` 回目の再接続までの待ち時間（`base * 2^attempt`、上限あり）
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// 再接続しても解決しないエラーかどうか
pub fn should_exit_immediately(error: &ClientError) -> bool {
    match error {
        ClientError::Unauthorized => true,
        ClientError::Password(PasswordError::Api(api)) => is_permanent(api),
        ClientError::Password(_) => true,
        ClientError::Load(LoadRoomError::Room(api)) => is_permanent(api),
        ClientError::Api(api) => is_permanent(api),
        _ => false,
    }
}

fn is_permanent(error: &ApiError) -> bool {
    matches!(error, ApiError::Unauthorized | ApiError::NotFound(_))
}
