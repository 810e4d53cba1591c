//! Conversion logic between DTOs and domain types.
//!
//! Inbound payloads are validated here, at the transport boundary, before any
//! of them reaches the room view.

use p42_shared::time::rfc3339_to_timestamp;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::domain::{
    CardAllocation, CardId, ChatMessage, ChatTarget, ClientCommand, CorrelationId, GameOutcome,
    InboundFrame, MessageKind, Nickname, OutboundFrame, Phase, PlayerId, PlayerPatch,
    PlayerRecord, PremiumPanel, ProtocolError, RoomId, RoomSnapshot, RoomState, RoomStatus,
    ServerEvent, Timestamp, ViewerRecord,
};
use crate::infrastructure::dto::{
    model::{
        CardDto, ChatMessageDto, PlayerDto, PlayerPatchDto, RoomDto, RoomStatusDto, ViewerDto,
    },
    websocket::{
        AckDto, ChatScopeDto, EnableDto, ErrorDto, GameEndDto, JoinRoomDto, ModerationDto,
        NotificationDto, PhaseChangeDto, PremiumDto, RenameDto, RenamedDto, RoomStateDto,
        SendMessageDto, SyncGameDto, TerminalDto, ThrowItemDto,
    },
};

// ========================================
// DTO → Domain
// ========================================

fn parse_timestamp(value: &str) -> Result<Timestamp, ProtocolError> {
    rfc3339_to_timestamp(value)
        .map(Timestamp::new)
        .ok_or_else(|| ProtocolError::InvalidTimestamp(value.to_string()))
}

impl From<RoomStatusDto> for RoomStatus {
    fn from(dto: RoomStatusDto) -> Self {
        match dto {
            RoomStatusDto::Waiting => RoomStatus::Waiting,
            RoomStatusDto::InProgress => RoomStatus::InProgress,
            RoomStatusDto::Completed => RoomStatus::Completed,
        }
    }
}

impl From<CardDto> for CardAllocation {
    fn from(dto: CardDto) -> Self {
        Self {
            card: CardId::new(dto.card_id),
            quantity: dto.quantity,
        }
    }
}

impl TryFrom<RoomDto> for RoomSnapshot {
    type Error = ProtocolError;

    fn try_from(dto: RoomDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::new(dto.id)?,
            name: dto.name,
            status: dto.status.into(),
            game_type: dto.game_type,
            debate_time: dto.debate_time,
            max_players: dto.max_players,
            is_private: dto.is_private,
            password: dto.password,
            phase: dto.phase,
            white_flag: dto.white_flag,
            anonymous_game: dto.anonymous_game,
            cards: dto.cards.into_iter().map(CardAllocation::from).collect(),
            creator: PlayerId::new(dto.creator)?,
            created_at: parse_timestamp(&dto.created_at)?,
            updated_at: parse_timestamp(&dto.updated_at)?,
        })
    }
}

impl TryFrom<PlayerDto> for PlayerRecord {
    type Error = ProtocolError;

    fn try_from(dto: PlayerDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlayerId::new(dto.id)?,
            nickname: Nickname::from_server(dto.nickname)?,
            alive: dto.alive,
            ready: dto.ready,
            in_love: dto.in_love,
            charmed: dto.charmed,
            infected: dto.infected,
            card: dto.card.map(CardId::new),
        })
    }
}

impl TryFrom<PlayerPatchDto> for PlayerPatch {
    type Error = ProtocolError;

    fn try_from(dto: PlayerPatchDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlayerId::new(dto.id)?,
            nickname: dto.nickname.map(Nickname::from_server).transpose()?,
            alive: dto.alive,
            ready: dto.ready,
            in_love: dto.in_love,
            charmed: dto.charmed,
            infected: dto.infected,
            card: dto.card.map(CardId::new),
        })
    }
}

impl TryFrom<ViewerDto> for ViewerRecord {
    type Error = ProtocolError;

    fn try_from(dto: ViewerDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlayerId::new(dto.id)?,
            nickname: Nickname::from_server(dto.nickname)?,
        })
    }
}

impl TryFrom<ChatMessageDto> for ChatMessage {
    type Error = ProtocolError;

    fn try_from(dto: ChatMessageDto) -> Result<Self, Self::Error> {
        Ok(Self {
            sender_id: dto.sender_id.map(PlayerId::new).transpose()?,
            nickname: dto.nickname,
            channel: dto.channel,
            text: dto.message,
            icon: dto.icon,
            sound: dto.sound,
            kind: MessageKind {
                leader_only: dto.leader_only,
                personal: dto.personal,
                site: dto.site,
            },
            sent_at: parse_timestamp(&dto.sent_at)?,
        })
    }
}

impl TryFrom<RoomStateDto> for RoomState {
    type Error = ProtocolError;

    fn try_from(dto: RoomStateDto) -> Result<Self, Self::Error> {
        Ok(Self {
            room: dto.room.try_into()?,
            players: convert_all(dto.players)?,
            viewers: convert_all(dto.viewers)?,
        })
    }
}

/// Convert every DTO of a list, failing on the first invalid one.
pub fn convert_all<D, T>(items: Vec<D>) -> Result<Vec<T>, ProtocolError>
where
    T: TryFrom<D, Error = ProtocolError>,
{
    items.into_iter().map(T::try_from).collect()
}

fn payload<T: DeserializeOwned>(event: &str, value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|e| ProtocolError::MalformedPayload {
        event: event.to_string(),
        reason: e.to_string(),
    })
}

/// Like [`payload`], but a missing (`null`) payload yields the default value.
fn payload_or_default<T: DeserializeOwned + Default>(
    event: &str,
    value: Value,
) -> Result<T, ProtocolError> {
    if value.is_null() {
        return Ok(T::default());
    }
    payload(event, value)
}

/// Enable signals arrive as `null` (meaning enabled), a bare boolean or `{"enabled": bool}`.
fn enable_flag(event: &str, value: Value) -> Result<bool, ProtocolError> {
    match value {
        Value::Null => Ok(true),
        Value::Bool(enabled) => Ok(enabled),
        other => payload::<EnableDto>(event, other).map(|dto| dto.enabled),
    }
}

/// Decode an inbound frame into a typed server event.
///
/// `received_at` stamps payloads that carry no timestamp of their own.
pub fn decode_event(frame: InboundFrame, received_at: Timestamp) -> Result<ServerEvent, ProtocolError> {
    let InboundFrame { event, payload: data } = frame;
    let name = event.as_str();

    let decoded = match name {
        "lobbyUpdate" => ServerEvent::LobbyUpdate(payload::<RoomStateDto>(name, data)?.try_into()?),
        "gameUpdate" => ServerEvent::GameUpdate(payload::<RoomStateDto>(name, data)?.try_into()?),
        "enableStart" => ServerEvent::EnableStart(enable_flag(name, data)?),
        "enableReadyOption" => ServerEvent::EnableReadyOption(enable_flag(name, data)?),
        "newMessage" => {
            ServerEvent::NewMessage(payload::<ChatMessageDto>(name, data)?.try_into()?)
        }
        "privateNotification" => {
            let dto: NotificationDto = payload(name, data)?;
            let sent_at = match dto.sent_at.as_deref() {
                Some(value) => parse_timestamp(value)?,
                None => received_at,
            };
            ServerEvent::PrivateNotification(ChatMessage {
                sender_id: None,
                nickname: String::new(),
                channel: 0,
                text: dto.message,
                icon: dto.icon,
                sound: dto.sound,
                kind: MessageKind {
                    personal: true,
                    ..MessageKind::default()
                },
                sent_at,
            })
        }
        "error" => {
            // Some server paths send the error as a bare string
            let dto = match data {
                Value::String(message) => ErrorDto {
                    message,
                    correlation_id: None,
                },
                other => payload::<ErrorDto>(name, other)?,
            };
            ServerEvent::ServerError {
                message: dto.message,
                correlation_id: dto.correlation_id.map(CorrelationId::from_uuid),
            }
        }
        "gameStarted" => ServerEvent::GameStarted,
        "phaseChange" => {
            let dto: PhaseChangeDto = payload(name, data)?;
            ServerEvent::PhaseChange {
                phase: Phase::from_wire(&dto.phase),
                code: dto.code,
                timer: dto.timer,
            }
        }
        "gameEnd" => {
            let dto: GameEndDto = payload(name, data)?;
            ServerEvent::GameEnd(GameOutcome {
                winning_camp: dto.winner,
                message: dto.message,
            })
        }
        "playerUpdate" => {
            ServerEvent::PlayerUpdate(convert_all(payload::<Vec<PlayerPatchDto>>(name, data)?)?)
        }
        "playerRenamed" => {
            let dto: RenamedDto = payload(name, data)?;
            ServerEvent::PlayerRenamed {
                id: PlayerId::new(dto.player_id)?,
                nickname: Nickname::from_server(dto.nickname)?,
            }
        }
        "premiumUpdate" => {
            let dto: PremiumDto = payload(name, data)?;
            ServerEvent::PremiumUpdate(PremiumPanel {
                active: dto.is_premium,
                throwable_items: dto.items,
            })
        }
        "gameDissolved" => ServerEvent::GameDissolved {
            reason: payload_or_default::<TerminalDto>(name, data)?.reason,
        },
        "kicked" => ServerEvent::Kicked {
            reason: payload_or_default::<TerminalDto>(name, data)?.reason,
        },
        "commandAck" => {
            let dto: AckDto = payload(name, data)?;
            ServerEvent::CommandAck {
                correlation_id: CorrelationId::from_uuid(dto.correlation_id),
                ok: dto.ok,
                error: dto.error,
            }
        }
        _ => return Err(ProtocolError::UnknownEvent(name.to_string())),
    };

    Ok(decoded)
}

// ========================================
// Domain → DTO
// ========================================

impl From<&CardAllocation> for CardDto {
    fn from(model: &CardAllocation) -> Self {
        Self {
            card_id: model.card.value(),
            quantity: model.quantity,
        }
    }
}

fn to_payload<T: Serialize>(event: &'static str, dto: T) -> Result<OutboundFrame, ProtocolError> {
    let payload = serde_json::to_value(dto).map_err(|e| ProtocolError::Encode {
        event: event.to_string(),
        reason: e.to_string(),
    })?;
    Ok(OutboundFrame { event, payload })
}

/// Encode a client command, embedding its correlation id in the payload.
pub fn encode_command(
    command: &ClientCommand,
    correlation_id: CorrelationId,
) -> Result<OutboundFrame, ProtocolError> {
    let event = command.name();
    let correlation_id = correlation_id.as_uuid();

    match command {
        ClientCommand::JoinRoom { room_id, password } => to_payload(
            event,
            JoinRoomDto {
                correlation_id,
                room_id: room_id.as_str().to_string(),
                password: password.clone(),
            },
        ),
        ClientCommand::SyncGame { room_id } => to_payload(
            event,
            SyncGameDto {
                correlation_id,
                room_id: room_id.as_str().to_string(),
            },
        ),
        ClientCommand::Moderation {
            room_id,
            target,
            action,
        } => to_payload(
            event,
            ModerationDto {
                correlation_id,
                room_id: room_id.as_str().to_string(),
                target: target.as_str().to_string(),
                action: action.as_str().to_string(),
            },
        ),
        ClientCommand::ThrowItem {
            room_id,
            item,
            target,
        } => to_payload(
            event,
            ThrowItemDto {
                correlation_id,
                room_id: room_id.as_str().to_string(),
                item: item.clone(),
                target: target.as_str().to_string(),
            },
        ),
        ClientCommand::SendMessage {
            room_id,
            channel,
            text,
            target,
        } => {
            let (scope, to) = match target {
                ChatTarget::Room => (ChatScopeDto::Room, None),
                ChatTarget::Private(player) => {
                    (ChatScopeDto::Private, Some(player.as_str().to_string()))
                }
                ChatTarget::Guild => (ChatScopeDto::Guild, None),
            };
            to_payload(
                event,
                SendMessageDto {
                    correlation_id,
                    room_id: room_id.as_str().to_string(),
                    channel: *channel,
                    message: text.as_str().to_string(),
                    scope,
                    to,
                },
            )
        }
        ClientCommand::Rename { room_id, nickname } => to_payload(
            event,
            RenameDto {
                correlation_id,
                room_id: room_id.as_str().to_string(),
                nickname: nickname.as_str().to_string(),
            },
        ),
    }
}
