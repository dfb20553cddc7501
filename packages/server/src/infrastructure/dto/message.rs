//! Message record DTOs.

use serde::{Deserialize, Serialize};

/// One message log entry as stored on disk and sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageDto {
    System {
        message: String,
        timestamp: String,
    },
    Chat {
        username: String,
        message: String,
        timestamp: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

/// One live connection as listed in presence snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub id: String,
    pub username: String,
    pub color: Option<String>,
    pub dnd: bool,
}
