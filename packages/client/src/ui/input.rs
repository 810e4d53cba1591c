//! 入力行の解釈
//!
//! `/` で始まる行はコマンド、それ以外はルームチャンネルへのチャットとして扱います。

use thiserror::Error;

use crate::domain::{
    CardAllocation, CardId, ChatTarget, MessageText, ModerationAction, Nickname, PlayerId,
    ValueObjectError,
};

/// 入力行から解釈した操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Ready(bool),
    Start,
    Sync,
    Throw { item: String, target: PlayerId },
    Rename(Nickname),
    Moderate { target: PlayerId, action: ModerationAction },
    Chat { text: MessageText, target: ChatTarget },
    /// 議論タイマー（秒）の変更
    Timer(u32),
    /// 役職カード構成の変更
    Cards(Vec<CardAllocation>),
    Who,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command '/{0}' (try /help)")]
    UnknownCommand(String),

    #[error(transparent)]
    Invalid(#[from] ValueObjectError),
}

pub const HELP: &str = "\
Commands:
  /ready, /unready         toggle your ready flag
  /start                   start the game (room creator)
  /sync                    ask the server to resend the room state
  /throw <item> <player>   throw an item at a player
  /rename <nickname>       change your nickname
  /kick|/mute|/unmute|/ban <player>
  /w <player> <text>       whisper to a player
  /guild <text>            send to your guild
  /timer <seconds>         set the debate timer (room creator)
  /cards <id>x<qty> ...    set the card deck, e.g. /cards 1x4 2x1 (room creator)
  /who                     show the room
  /quit                    leave the room
Anything else is sent to the room chat.";

pub fn parse_line(line: &str) -> Result<Intent, InputError> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Intent::Chat {
            text: MessageText::new(line.to_string())?,
            target: ChatTarget::Room,
        });
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "ready" => Ok(Intent::Ready(true)),
        "unready" => Ok(Intent::Ready(false)),
        "start" => Ok(Intent::Start),
        "sync" => Ok(Intent::Sync),
        "who" => Ok(Intent::Who),
        "help" => Ok(Intent::Help),
        "quit" | "exit" => Ok(Intent::Quit),
        "throw" => {
            let (item, target) = two_args(rest, "/throw <item> <player>")?;
            Ok(Intent::Throw {
                item: item.to_string(),
                target: PlayerId::new(target.to_string())?,
            })
        }
        "rename" => {
            if rest.is_empty() {
                return Err(InputError::Usage("/rename <nickname>"));
            }
            Ok(Intent::Rename(Nickname::new(rest.to_string())?))
        }
        "kick" => moderate(rest, ModerationAction::Kick),
        "mute" => moderate(rest, ModerationAction::Mute),
        "unmute" => moderate(rest, ModerationAction::Unmute),
        "ban" => moderate(rest, ModerationAction::Ban),
        "w" => {
            let (target, text) = two_args(rest, "/w <player> <text>")?;
            Ok(Intent::Chat {
                text: MessageText::new(text.to_string())?,
                target: ChatTarget::Private(PlayerId::new(target.to_string())?),
            })
        }
        "guild" => {
            if rest.is_empty() {
                return Err(InputError::Usage("/guild <text>"));
            }
            Ok(Intent::Chat {
                text: MessageText::new(rest.to_string())?,
                target: ChatTarget::Guild,
            })
        }
        "timer" => rest
            .parse::<u32>()
            .map(Intent::Timer)
            .map_err(|_| InputError::Usage("/timer <seconds>")),
        "cards" => parse_cards(rest).map(Intent::Cards),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

fn parse_cards(rest: &str) -> Result<Vec<CardAllocation>, InputError> {
    const USAGE: &str = "/cards <id>x<qty> ...";
    if rest.is_empty() {
        return Err(InputError::Usage(USAGE));
    }
    rest.split_whitespace()
        .map(|entry| {
            let (card, quantity) = entry.split_once('x').ok_or(InputError::Usage(USAGE))?;
            match (card.parse::<u32>(), quantity.parse::<u32>()) {
                (Ok(card), Ok(quantity)) => Ok(CardAllocation {
                    card: CardId::new(card),
                    quantity,
                }),
                _ => Err(InputError::Usage(USAGE)),
            }
        })
        .collect()
}

fn moderate(rest: &str, action: ModerationAction) -> Result<Intent, InputError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(InputError::Usage("/kick|/mute|/unmute|/ban <player>"));
    }
    Ok(Intent::Moderate {
        target: PlayerId::new(rest.to_string())?,
        action,
    })
}

/// 先頭の 1 語と残りに分ける（残りは空であってはならない）
fn two_args<'a>(rest: &'a str, usage: &'static str) -> Result<(&'a str, &'a str), InputError> {
    match rest.split_once(char::is_whitespace) {
        Some((first, second)) if !second.trim().is_empty() => Ok((first, second.trim())),
        _ => Err(InputError::Usage(usage)),
    }
}
