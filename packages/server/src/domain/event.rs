//! Events flowing in and out of the room.

use super::{
    entity::{ChatMessage, ColorMap, Connection, Message},
    value_object::{Color, PageNumber, Username},
};

/// Validated event received from an active connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Announce presence; the claimed name is informational only.
    Join { claimed_username: Option<Username> },
    Chat {
        message: String,
        image: Option<String>,
    },
    LoadMessages { page: PageNumber },
    UpdateColor { color: Color },
    ToggleDnd { dnd: bool },
}

/// Event pushed to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    UserJoin {
        username: Username,
        users: Vec<Connection>,
        user_colors: ColorMap,
    },
    ChatMessage(ChatMessage),
    ChatHistory {
        /// Newest first
        messages: Vec<Message>,
        page: PageNumber,
        total_messages: usize,
        user_colors: ColorMap,
    },
    UpdateColors { user_colors: ColorMap },
    UpdateUsers { users: Vec<Connection> },
    UserLeave {
        username: Username,
        users: Vec<Connection>,
        user_colors: ColorMap,
    },
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserJoin { .. } => "user_join",
            ServerEvent::ChatMessage(_) => "chat_message",
            ServerEvent::ChatHistory { .. } => "chat_history",
            ServerEvent::UpdateColors { .. } => "update_colors",
            ServerEvent::UpdateUsers { .. } => "update_users",
            ServerEvent::UserLeave { .. } => "user_leave",
        }
    }
}
