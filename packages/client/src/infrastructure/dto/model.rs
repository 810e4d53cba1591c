//! Room, player and chat DTOs shared by the WebSocket and HTTP protocols.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatusDto {
    Waiting,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    pub card_id: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub status: RoomStatusDto,
    pub game_type: u32,
    pub debate_time: u32,
    pub max_players: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub phase: i32,
    #[serde(default)]
    pub white_flag: bool,
    #[serde(default)]
    pub anonymous_game: bool,
    #[serde(default)]
    pub cards: Vec<CardDto>,
    pub creator: String,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub nickname: String,
    pub alive: bool,
    pub ready: bool,
    #[serde(default)]
    pub in_love: bool,
    #[serde(default)]
    pub charmed: bool,
    #[serde(default)]
    pub infected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<u32>,
}

/// Partial player object: absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatchDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_love: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDto {
    pub id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub channel: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default)]
    pub leader_only: bool,
    #[serde(default)]
    pub personal: bool,
    #[serde(default)]
    pub site: bool,
    /// RFC 3339
    pub sent_at: String,
}
