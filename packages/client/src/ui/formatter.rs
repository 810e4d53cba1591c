//! View formatting for terminal display.

use p42_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, Effect, GameOutcome, Phase, PlayerId, Redirect, RoomStatus, RoomView,
    SessionEnd, Timestamp,
};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct ViewFormatter;

impl ViewFormatter {
    /// Format the room header and the player/viewer roster
    ///
    /// # Arguments
    ///
    /// * `view` - The current room view
    /// * `me` - The local player's ID (to mark as "me")
    pub fn format_roster(view: &RoomView, me: &PlayerId) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));

        match &view.room {
            Some(room) => {
                let status = match room.status {
                    RoomStatus::Waiting => "waiting",
                    RoomStatus::InProgress => "in progress",
                    RoomStatus::Completed => "completed",
                };
                output.push_str(&format!(
                    "{} [{}] {}/{} players\n",
                    room.name,
                    status,
                    view.players.len(),
                    room.max_players
                ));
            }
            None => output.push_str("(Room not loaded)\n"),
        }

        output.push_str("Players:\n");
        if view.players.is_empty() {
            output.push_str("(No players)\n");
        }
        for player in &view.players {
            let mut tags = Vec::new();
            if &player.id == me {
                tags.push("me");
            }
            if view.room.as_ref().is_some_and(|room| room.creator == player.id) {
                tags.push("creator");
            }
            if player.ready && !view.game_started {
                tags.push("ready");
            }
            if !player.alive {
                tags.push("dead");
            }
            if tags.is_empty() {
                output.push_str(&format!("  {}\n", player.nickname));
            } else {
                output.push_str(&format!("  {} ({})\n", player.nickname, tags.join(", ")));
            }
        }

        if !view.viewers.is_empty() {
            let names: Vec<&str> = view.viewers.iter().map(|v| v.nickname.as_str()).collect();
            output.push_str(&format!("Viewers: {}\n", names.join(", ")));
        }

        if view.can_start_game && !view.game_started {
            output.push_str("The game can be started (/start)\n");
        } else if view.can_be_ready {
            output.push_str("The room is full, get ready (/ready)\n");
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a chat message, private notification or site message
    pub fn format_message(message: &ChatMessage) -> String {
        let sent_at = format_timestamp(message.sent_at);
        if message.kind.site {
            format!("\n* {} ({})\n", message.text, sent_at)
        } else if message.kind.personal {
            format!("\n! {} ({})\n", message.text, sent_at)
        } else {
            let leader = if message.kind.leader_only {
                " [leader]"
            } else {
                ""
            };
            format!(
                "\n@{}{}: {}\n  sent at {}\n",
                message.nickname, leader, message.text, sent_at
            )
        }
    }

    pub fn format_phase(phase: &Phase, timer: Option<u32>) -> String {
        let time_of_day = if phase.is_night() { "Night" } else { "Day" };
        match timer {
            Some(seconds) => format!("\n~ {} phase: {} ({}s)\n", time_of_day, phase, seconds),
            None => format!("\n~ {} phase: {}\n", time_of_day, phase),
        }
    }

    pub fn format_outcome(outcome: &GameOutcome) -> String {
        let mut output = format!("\n\n{}\nGame over: {} win\n", RULE, outcome.winning_camp);
        if let Some(message) = &outcome.message {
            output.push_str(message);
            output.push('\n');
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn format_redirect(redirect: &Redirect) -> String {
        let headline = match redirect.cause {
            SessionEnd::Dissolved => "The room was dissolved",
            SessionEnd::Kicked => "You were kicked from the room",
        };
        match &redirect.reason {
            Some(reason) => format!("\n{}: {}\n", headline, reason),
            None => format!("\n{}\n", headline),
        }
    }

    pub fn format_effect(effect: &Effect) -> String {
        match effect {
            Effect::PlaySound(cue) => format!("\x07[sound: {}]\n", cue.0),
            Effect::Toast(text) => format!("\n[!] {}\n", text),
            Effect::Navigate(redirect) => Self::format_redirect(redirect),
        }
    }

    /// Format everything that changed between two consecutive views
    ///
    /// New messages are printed in order; the roster is reprinted when the
    /// room, players or derived flags changed.
    pub fn format_changes(previous: &RoomView, next: &RoomView, me: &PlayerId) -> String {
        let mut output = String::new();

        if next.game_started && !previous.game_started {
            output.push_str("\n>>> The game has started\n");
        }

        if next.phase != previous.phase
            && let Some(phase) = &next.phase
        {
            output.push_str(&Self::format_phase(phase, next.timer));
        }

        let roster_changed = next.room != previous.room
            || next.players != previous.players
            || next.viewers != previous.viewers
            || next.can_start_game != previous.can_start_game
            || next.can_be_ready != previous.can_be_ready;
        if roster_changed {
            output.push_str(&Self::format_roster(next, me));
        }

        // Messages are append-only
        let seen = previous.messages.len().min(next.messages.len());
        for message in &next.messages[seen..] {
            output.push_str(&Self::format_message(message));
        }

        if next.outcome != previous.outcome
            && let Some(outcome) = &next.outcome
        {
            output.push_str(&Self::format_outcome(outcome));
        }

        output
    }
}

fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp_to_rfc3339(timestamp.value()).unwrap_or_else(|| "-".to_string())
}
