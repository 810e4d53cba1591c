//! パスワード入力済みフラグの保存 trait 定義
//!
//! パスワード付きルームに一度正しいパスワードを入力したことを、ルーム ID ごとに記録します。
//! これがクライアント側で永続化される唯一の状態です。

use async_trait::async_trait;

use super::{error::StoreError, value_object::RoomId};

#[async_trait]
pub trait PasswordMemory: Send + Sync {
    /// パスワード入力済みかどうか
    async fn is_unlocked(&self, room_id: &RoomId) -> Result<bool, StoreError>;

    /// パスワード入力済みとして記録
    async fn remember(&self, room_id: &RoomId) -> Result<(), StoreError>;
}
