//! Derived booleans recomputed from the room snapshot.
//!
//! Pure functions without side effects. The server may override the result
//! with an explicit signal; the view keeps whichever arrived last.

use super::{
    entity::{PlayerRecord, RoomSnapshot, RoomStatus},
    phase::Phase,
};

/// `true` iff every player other than the creator is ready and the room is full.
pub fn can_start_game(room: &RoomSnapshot, players: &[PlayerRecord]) -> bool {
    is_full(room, players)
        && players
            .iter()
            .filter(|player| player.id != room.creator)
            .all(|player| player.ready)
}

/// `true` iff the room is still waiting for players and is full.
pub fn can_be_ready(room: &RoomSnapshot, players: &[PlayerRecord]) -> bool {
    room.status == RoomStatus::Waiting && is_full(room, players)
}

/// `true` iff the phase is classified as night.
pub fn is_night(phase: Option<&Phase>) -> bool {
    phase.is_some_and(Phase::is_night)
}

fn is_full(room: &RoomSnapshot, players: &[PlayerRecord]) -> bool {
    usize::try_from(room.max_players).is_ok_and(|max| players.len() == max)
}
