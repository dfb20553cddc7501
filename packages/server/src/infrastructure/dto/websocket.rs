//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::message::{ConnectionDto, MessageDto};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEventDto {
    UserJoin {
        #[serde(default)]
        username: Option<String>,
    },
    ChatMessage {
        #[serde(default)]
        message: String,
        #[serde(default)]
        image: Option<String>,
    },
    LoadMessages {
        #[serde(default = "first_page")]
        page: i64,
    },
    UpdateColor {
        color: String,
    },
    DndToggle {
        dnd: bool,
    },
}

fn first_page() -> i64 {
    1
}

/// Events sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum OutboundEventDto {
    UserJoin {
        username: String,
        users: Vec<ConnectionDto>,
        user_colors: BTreeMap<String, String>,
    },
    ChatMessage(MessageDto),
    ChatHistory {
        messages: Vec<MessageDto>,
        page: u32,
        total_messages: usize,
        user_colors: BTreeMap<String, String>,
    },
    UpdateColors {
        user_colors: BTreeMap<String, String>,
    },
    UpdateUsers {
        users: Vec<ConnectionDto>,
    },
    UserLeave {
        username: String,
        users: Vec<ConnectionDto>,
        user_colors: BTreeMap<String, String>,
    },
}
