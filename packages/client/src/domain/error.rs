//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({len} > {max} characters)")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// 受信ペイロードの検証エラー（トランスポート境界で発生）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    #[error("Malformed payload for '{event}': {reason}")]
    MalformedPayload { event: String, reason: String },

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),

    #[error("Failed to encode '{event}': {reason}")]
    Encode { event: String, reason: String },
}

/// イベントチャンネル（ソケット）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The server refused the credentials supplied on connect
    #[error("Connection rejected: unauthorized")]
    Unauthorized,

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Channel is closed")]
    Closed,
}

/// REST API 呼び出しのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// ローカル保存（パスワード入力済みフラグ）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupted storage: {0}")]
    Corrupted(String),
}
