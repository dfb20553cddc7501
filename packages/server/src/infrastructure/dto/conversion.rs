//! Conversion logic between DTOs and domain entities.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hatchat_shared::time::to_iso_millis;

use crate::domain::{
    ChatMessage, ClientEvent, Color, ColorMap, Connection, Message, PageNumber, ServerEvent,
    SystemMessage, Username, ValueObjectError,
};

use super::{
    message::{ConnectionDto, MessageDto},
    websocket::{InboundEventDto, OutboundEventDto},
};

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValueObjectError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| ValueObjectError::InvalidTimestamp(raw.to_string()))
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<MessageDto> for Message {
    type Error = ValueObjectError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        match dto {
            MessageDto::System { message, timestamp } => Ok(Message::System(SystemMessage {
                message,
                timestamp: parse_timestamp(&timestamp)?,
            })),
            MessageDto::Chat {
                username,
                message,
                timestamp,
                color,
                image,
            } => Ok(Message::Chat(ChatMessage {
                username: Username::new(username)?,
                message,
                timestamp: parse_timestamp(&timestamp)?,
                color: color.and_then(|c| Color::new(c).ok()),
                image,
            })),
        }
    }
}

impl TryFrom<InboundEventDto> for ClientEvent {
    type Error = ValueObjectError;

    fn try_from(dto: InboundEventDto) -> Result<Self, Self::Error> {
        match dto {
            InboundEventDto::UserJoin { username } => Ok(ClientEvent::Join {
                claimed_username: username.and_then(|name| Username::new(name).ok()),
            }),
            InboundEventDto::ChatMessage { message, image } => Ok(ClientEvent::Chat {
                message,
                image: image.filter(|reference| !reference.trim().is_empty()),
            }),
            InboundEventDto::LoadMessages { page } => Ok(ClientEvent::LoadMessages {
                page: PageNumber::clamped(page),
            }),
            InboundEventDto::UpdateColor { color } => Ok(ClientEvent::UpdateColor {
                color: Color::new(color)?,
            }),
            InboundEventDto::DndToggle { dnd } => Ok(ClientEvent::ToggleDnd { dnd }),
        }
    }
}

/// Build a color map from its stored form.
///
/// Entries with a blank username or color are dropped.
pub fn color_map_from_dto(dto: BTreeMap<String, String>) -> ColorMap {
    dto.into_iter()
        .filter_map(|(username, color)| {
            match (Username::new(username.clone()), Color::new(color)) {
                (Ok(username), Ok(color)) => Some((username, color)),
                _ => {
                    tracing::warn!("Dropping invalid color directory entry for '{}'", username);
                    None
                }
            }
        })
        .collect()
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for MessageDto {
    fn from(model: &ChatMessage) -> Self {
        MessageDto::Chat {
            username: model.username.as_str().to_string(),
            message: model.message.clone(),
            timestamp: to_iso_millis(&model.timestamp),
            color: model.color.as_ref().map(|c| c.as_str().to_string()),
            image: model.image.clone(),
        }
    }
}

impl From<&Message> for MessageDto {
    fn from(model: &Message) -> Self {
        match model {
            Message::System(system) => MessageDto::System {
                message: system.message.clone(),
                timestamp: to_iso_millis(&system.timestamp),
            },
            Message::Chat(chat) => chat.into(),
        }
    }
}

impl From<&Connection> for ConnectionDto {
    fn from(model: &Connection) -> Self {
        Self {
            id: model.id.to_string(),
            username: model.username.as_str().to_string(),
            color: model.color.as_ref().map(|c| c.as_str().to_string()),
            dnd: model.dnd,
        }
    }
}

pub fn color_map_to_dto(colors: &ColorMap) -> BTreeMap<String, String> {
    colors
        .iter()
        .map(|(username, color)| (username.as_str().to_string(), color.as_str().to_string()))
        .collect()
}

pub fn connections_to_dto(connections: &[Connection]) -> Vec<ConnectionDto> {
    connections.iter().map(ConnectionDto::from).collect()
}

impl From<&ServerEvent> for OutboundEventDto {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::UserJoin {
                username,
                users,
                user_colors,
            } => OutboundEventDto::UserJoin {
                username: username.as_str().to_string(),
                users: connections_to_dto(users),
                user_colors: color_map_to_dto(user_colors),
            },
            ServerEvent::ChatMessage(chat) => OutboundEventDto::ChatMessage(chat.into()),
            ServerEvent::ChatHistory {
                messages,
                page,
                total_messages,
                user_colors,
            } => OutboundEventDto::ChatHistory {
                messages: messages.iter().map(MessageDto::from).collect(),
                page: page.value(),
                total_messages: *total_messages,
                user_colors: color_map_to_dto(user_colors),
            },
            ServerEvent::UpdateColors { user_colors } => OutboundEventDto::UpdateColors {
                user_colors: color_map_to_dto(user_colors),
            },
            ServerEvent::UpdateUsers { users } => OutboundEventDto::UpdateUsers {
                users: connections_to_dto(users),
            },
            ServerEvent::UserLeave {
                username,
                users,
                user_colors,
            } => OutboundEventDto::UserLeave {
                username: username.as_str().to_string(),
                users: connections_to_dto(users),
                user_colors: color_map_to_dto(user_colors),
            },
        }
    }
}
