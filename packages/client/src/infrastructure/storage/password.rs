//! パスワード入力済みフラグの保存実装
//!
//! - `InMemoryPasswordMemory`: プロセス内のみ（テスト用）
//! - `JsonFilePasswordMemory`: JSON ファイルにルーム ID の集合として保存

use std::{collections::BTreeSet, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PasswordMemory, RoomId, StoreError};

/// インメモリ実装
#[derive(Debug, Default)]
pub struct InMemoryPasswordMemory {
    unlocked: Mutex<BTreeSet<String>>,
}

impl InMemoryPasswordMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordMemory for InMemoryPasswordMemory {
    async fn is_unlocked(&self, room_id: &RoomId) -> Result<bool, StoreError> {
        Ok(self.unlocked.lock().await.contains(room_id.as_str()))
    }

    async fn remember(&self, room_id: &RoomId) -> Result<(), StoreError> {
        self.unlocked
            .lock()
            .await
            .insert(room_id.as_str().to_string());
        Ok(())
    }
}

/// JSON ファイル実装
///
/// ファイルの中身はルーム ID の配列です。ファイルが存在しなければ空として扱います。
/// 読み書きはロックで直列化します。
#[derive(Debug)]
pub struct JsonFilePasswordMemory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFilePasswordMemory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupted(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn save(&self, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let json =
            serde_json::to_vec_pretty(unlocked).map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl PasswordMemory for JsonFilePasswordMemory {
    async fn is_unlocked(&self, room_id: &RoomId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.contains(room_id.as_str()))
    }

    async fn remember(&self, room_id: &RoomId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut unlocked = self.load().await?;
        if unlocked.insert(room_id.as_str().to_string()) {
            self.save(&unlocked).await?;
            tracing::debug!("Remembered password entry for room '{}'", room_id);
        }
        Ok(())
    }
}
