//! HTTP API response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::message::ConnectionDto;

/// Debug view of the room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub users: Vec<ConnectionDto>,
    pub user_colors: BTreeMap<String, String>,
    pub total_messages: usize,
}

/// Result of saving a transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSavedDto {
    pub index: usize,
}

/// Result of a transcript import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResultDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
