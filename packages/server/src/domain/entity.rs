//! Domain entities.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{
    error::HandshakeError,
    value_object::{Color, ConnectionId, Username},
};

/// Username → display color, ordered by username.
pub type ColorMap = BTreeMap<Username, Color>;

/// Validated connect-time parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub username: Username,
    pub color: Option<Color>,
}

impl Handshake {
    /// Build a handshake from raw query parameters.
    ///
    /// A missing or blank username refuses the connection. A blank color is
    /// the same as no color.
    pub fn parse(username: Option<&str>, color: Option<&str>) -> Result<Self, HandshakeError> {
        let username = username
            .and_then(|raw| Username::new(raw.to_string()).ok())
            .ok_or(HandshakeError::MissingUsername)?;
        let color = color.and_then(|raw| Color::new(raw.to_string()).ok());
        Ok(Self { username, color })
    }
}

/// One live session in the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub username: Username,
    pub color: Option<Color>,
    /// Do-not-disturb, tracked per connection rather than per username
    pub dnd: bool,
}

impl Connection {
    pub fn new(id: ConnectionId, username: Username, color: Option<Color>) -> Self {
        Self {
            id,
            username,
            color,
            dnd: false,
        }
    }
}

/// Lifecycle of a single connection.
///
/// `Connecting -> Active -> Disconnected`; `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Connecting,
    Active,
    Disconnected,
}

impl SessionPhase {
    /// Registration accepted. Only valid from `Connecting`.
    pub fn activate(self) -> Self {
        match self {
            SessionPhase::Connecting => SessionPhase::Active,
            other => other,
        }
    }

    pub fn disconnect(self) -> Self {
        SessionPhase::Disconnected
    }

    /// Whether client events should be routed in this phase
    pub fn accepts_events(&self) -> bool {
        matches!(self, SessionPhase::Active)
    }
}

/// Room notice such as "alice joined the chat"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMessage {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A message sent by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub username: Username,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Sender's color at send time; later color changes do not rewrite it.
    pub color: Option<Color>,
    /// Reference to an uploaded image
    pub image: Option<String>,
}

/// Immutable entry of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System(SystemMessage),
    Chat(ChatMessage),
}

impl Message {
    pub fn joined(username: &Username, timestamp: DateTime<Utc>) -> Self {
        Message::System(SystemMessage {
            message: format!("{} joined the chat", username),
            timestamp,
        })
    }

    pub fn left(username: &Username, timestamp: DateTime<Utc>) -> Self {
        Message::System(SystemMessage {
            message: format!("{} left the chat", username),
            timestamp,
        })
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Message::System(_))
    }
}

/// A saved chat transcript.
///
/// The server stores transcripts as opaque JSON documents and never looks
/// inside them.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript(serde_json::Value);

impl Transcript {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}
