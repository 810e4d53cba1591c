//! UI 層（ターミナルクライアント）
//!
//! ルーム画面をターミナル上に再現します。ビューの変化と副作用を表示し、
//! 入力行をコマンドに変換して送信します。

pub mod config;
pub mod error;
pub mod formatter;
pub mod input;
pub mod prompt;
pub mod reconnect;
pub mod runner;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
