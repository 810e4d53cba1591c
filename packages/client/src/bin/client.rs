//! Terminal client for a Project 42 game room.
//!
//! Loads the room over REST, unlocks it if it is private, then mounts the
//! room view on the game server's event channel. View changes and effects
//! are printed as they arrive; typed lines become commands (see `/help`).
//! Reconnects with exponential backoff when the connection drops.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin p42-client -- --room-id r1 --player-id u1 --nickname Alice
//! P42_TOKEN=... cargo run --bin p42-client -- -r r1 -p u1 -n Alice --password secret
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use p42_client::{
    domain::{Nickname, PlayerId, RoomId, ValueObjectError},
    ui::{ClientConfig, reconnect::ReconnectPolicy, run_client},
};
use p42_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "p42-client")]
#[command(about = "Terminal client for a Project 42 game room", long_about = None)]
struct Args {
    /// Room to open
    #[arg(short = 'r', long)]
    room_id: String,

    /// Your player ID
    #[arg(short = 'p', long)]
    player_id: String,

    /// Your nickname (used for @mentions)
    #[arg(short = 'n', long)]
    nickname: String,

    /// Game server event channel URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Game server REST API base URL
    #[arg(short = 'a', long, default_value = "http://127.0.0.1:8080/api")]
    api_url: String,

    /// Bearer token issued by the auth service
    #[arg(long, env = "P42_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Password for a private room
    #[arg(long)]
    password: Option<String>,

    /// File remembering rooms whose password was already entered
    #[arg(long, default_value = "p42-unlocked-rooms.json")]
    password_store: PathBuf,

    /// Maximum number of reconnection attempts
    #[arg(long, default_value_t = 5)]
    max_reconnects: u32,
}

impl Args {
    fn into_config(self) -> Result<ClientConfig, ValueObjectError> {
        Ok(ClientConfig {
            ws_url: self.url,
            api_url: self.api_url,
            room_id: RoomId::new(self.room_id)?,
            player_id: PlayerId::new(self.player_id)?,
            nickname: Nickname::new(self.nickname)?,
            token: self.token,
            password: self.password,
            password_store: self.password_store,
            reconnect: ReconnectPolicy {
                max_attempts: self.max_reconnects,
                base_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(30),
            },
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("p42_client", env!("CARGO_BIN_NAME"), "info");

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid argument: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
