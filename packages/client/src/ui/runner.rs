//! Client execution logic with reconnection support.

use super::{
    config::ClientConfig,
    error::ClientError,
    formatter::ViewFormatter,
    prompt::spawn_readline,
    reconnect::should_exit_immediately,
    session::{SessionOutcome, run_client_session},
};

/// Run the room client, reconnecting with exponential backoff when the
/// connection drops
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let policy = config.reconnect;
    let mut input = spawn_readline(format!("{}> ", config.nickname));
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Connecting to room {} as '{}' (attempt {}/{})",
            config.room_id,
            config.player_id,
            reconnect_count + 1,
            policy.max_attempts + 1
        );

        match run_client_session(&config, &mut input).await {
            Ok(SessionOutcome::UserExit) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Ok(SessionOutcome::Ended(redirect)) => {
                print!("{}", ViewFormatter::format_redirect(&redirect));
                return Ok(());
            }
            Err(e) if should_exit_immediately(&e) => {
                tracing::error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Session failed: {}", e);

                if !policy.should_attempt_reconnect(&e, reconnect_count) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        reconnect_count
                    );
                    return Err(e);
                }

                let delay = policy.backoff_delay(reconnect_count);
                reconnect_count += 1;
                tracing::info!(
                    "Reconnecting in {:?}... (attempt {}/{})",
                    delay,
                    reconnect_count + 1,
                    policy.max_attempts + 1
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
