//! Room session: load, unlock, connect, mount, then drive the terminal.

use std::sync::Arc;

use p42_shared::time::{Clock, SystemClock};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{Effect, GameApi, PasswordMemory, PlayerId, Redirect, RoomId, RoomView},
    infrastructure::{
        api::HttpGameApi, channel::WebSocketEventChannel, storage::JsonFilePasswordMemory,
    },
    usecase::{LoadRoomUseCase, MountParams, RoomSync, UnlockRoomUseCase},
};

use super::{
    config::ClientConfig,
    error::ClientError,
    formatter::ViewFormatter,
    input::{HELP, Intent, parse_line},
    prompt::redisplay_prompt,
};

/// Number of history messages printed when the room opens
const HISTORY_LINES: usize = 10;

/// How a session finished without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user left (Ctrl+C, Ctrl+D or /quit)
    UserExit,
    /// The server ended the session (room dissolved or kicked)
    Ended(Redirect),
}

/// Run one room session until the user leaves, the server ends it or the
/// connection drops.
pub async fn run_client_session(
    config: &ClientConfig,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionOutcome, ClientError> {
    let api: Arc<dyn GameApi> = Arc::new(HttpGameApi::new(
        config.api_url.clone(),
        config.token.clone(),
    ));
    let memory: Arc<dyn PasswordMemory> =
        Arc::new(JsonFilePasswordMemory::new(config.password_store.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let initial = LoadRoomUseCase::new(api.clone())
        .execute(&config.room_id)
        .await?;
    if let Some(room) = &initial.room {
        let unlock = UnlockRoomUseCase::new(api.clone(), memory)
            .execute(room, config.password.as_deref())
            .await?;
        tracing::debug!("Room access: {:?}", unlock);
    }
    api.join_room(&config.room_id).await?;

    let channel = Arc::new(
        WebSocketEventChannel::connect(&config.ws_url, config.token.as_deref()).await?,
    );
    let (sync, effects) = RoomSync::mount(
        channel,
        MountParams {
            room_id: config.room_id.clone(),
            local_player: config.player_id.clone(),
            nickname: config.nickname.clone(),
            password: config.password.clone(),
        },
        initial,
        clock,
    )
    .await?;

    println!(
        "\nYou are '{}' in room {}. Type /help for commands, Ctrl+C to leave.",
        config.nickname, config.room_id
    );
    print_opening(&sync.view().borrow(), &config.player_id);

    let prompt = format!("{}> ", config.nickname);
    let mut printer = tokio::spawn(print_updates(
        sync.view(),
        effects,
        config.player_id.clone(),
        prompt.clone(),
    ));
    redisplay_prompt(&prompt);

    let outcome = loop {
        tokio::select! {
            redirect = &mut printer => {
                break match redirect {
                    Ok(Some(redirect)) => Ok(SessionOutcome::Ended(redirect)),
                    _ => Err(ClientError::Connection("Connection lost".to_string())),
                };
            }
            line = input.recv() => {
                let Some(line) = line else {
                    break Ok(SessionOutcome::UserExit);
                };
                match parse_line(&line) {
                    Ok(Intent::Quit) => break Ok(SessionOutcome::UserExit),
                    Ok(intent) => {
                        if let Err(e) =
                            execute_intent(intent, &sync, api.as_ref(), &config.room_id, &config.player_id).await
                        {
                            println!("[!] {}", e);
                        }
                    }
                    Err(e) => println!("{}", e),
                }
                redisplay_prompt(&prompt);
            }
        }
    };

    printer.abort();
    sync.unmount().await;

    if matches!(outcome, Ok(SessionOutcome::UserExit))
        && let Err(e) = api.leave_room(&config.room_id).await
    {
        tracing::warn!("Failed to leave room: {}", e);
    }

    outcome
}

fn print_opening(view: &RoomView, me: &PlayerId) {
    let skip = view.messages.len().saturating_sub(HISTORY_LINES);
    for message in &view.messages[skip..] {
        print!("{}", ViewFormatter::format_message(message));
    }
    print!("{}", ViewFormatter::format_roster(view, me));
}

/// Print view changes and effects until the session ends.
///
/// Returns the redirect when the server ended the session, `None` when the
/// apply loop stopped for any other reason.
async fn print_updates(
    mut view: watch::Receiver<RoomView>,
    mut effects: mpsc::UnboundedReceiver<Effect>,
    me: PlayerId,
    prompt: String,
) -> Option<Redirect> {
    let mut previous = view.borrow_and_update().clone();

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = view.borrow_and_update().clone();
                print!("{}", ViewFormatter::format_changes(&previous, &next, &me));
                redisplay_prompt(&prompt);
                previous = next;
            }
            effect = effects.recv() => match effect {
                Some(Effect::Navigate(redirect)) => return Some(redirect),
                Some(effect) => {
                    print!("{}", ViewFormatter::format_effect(&effect));
                    redisplay_prompt(&prompt);
                }
                None => break,
            }
        }
    }

    // The apply loop is gone, but its last effects may still be queued
    while let Some(effect) = effects.recv().await {
        if let Effect::Navigate(redirect) = effect {
            return Some(redirect);
        }
    }
    None
}

async fn execute_intent(
    intent: Intent,
    sync: &RoomSync,
    api: &dyn GameApi,
    room_id: &RoomId,
    me: &PlayerId,
) -> Result<(), ClientError> {
    let commands = sync.commands();
    match intent {
        Intent::Ready(ready) => api.set_ready(room_id, ready).await?,
        Intent::Start => api.start_game(room_id).await?,
        Intent::Sync => {
            commands.sync().await?;
        }
        Intent::Throw { item, target } => {
            commands.throw_item(item, target).await?;
        }
        Intent::Rename(nickname) => {
            commands.rename(nickname).await?;
        }
        Intent::Moderate { target, action } => {
            commands.moderate(target, action).await?;
        }
        Intent::Chat { text, target } => {
            commands.send_chat(0, text, target).await?;
        }
        Intent::Timer(seconds) => api.update_timer(room_id, seconds).await?,
        Intent::Cards(cards) => api.update_cards(room_id, &cards).await?,
        Intent::Who => {
            let roster = ViewFormatter::format_roster(&sync.view().borrow(), me);
            print!("{}", roster);
        }
        Intent::Help => println!("{}", HELP),
        Intent::Quit => {}
    }
    Ok(())
}
