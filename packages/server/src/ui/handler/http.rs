//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::Transcript,
    infrastructure::dto::{
        conversion::{color_map_to_dto, connections_to_dto},
        http::{ImportResultDto, RoomStateDto, TranscriptSavedDto},
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get current room state
pub async fn debug_room_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoomStateDto>, StatusCode> {
    let room = state.router.room_state().await.map_err(|e| {
        tracing::error!("Failed to get room state: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    // Domain Model から DTO への変換
    Ok(Json(RoomStateDto {
        users: connections_to_dto(&room.users),
        user_colors: color_map_to_dto(&room.user_colors),
        total_messages: room.total_messages,
    }))
}

/// Export every saved transcript
pub async fn list_transcripts(State(state): State<Arc<AppState>>) -> Json<Vec<serde_json::Value>> {
    let transcripts = state.transcripts.list().await;
    Json(transcripts.into_iter().map(Transcript::into_json).collect())
}

pub async fn save_transcript(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<TranscriptSavedDto>) {
    let index = state.transcripts.save(Transcript::new(body)).await;
    (StatusCode::CREATED, Json(TranscriptSavedDto { index }))
}

pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state
        .transcripts
        .get(index)
        .await
        .map(|transcript| Json(transcript.into_json()))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn delete_transcript(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> StatusCode {
    match state.transcripts.delete(index).await {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

pub async fn delete_all_transcripts(State(state): State<Arc<AppState>>) -> StatusCode {
    state.transcripts.delete_all().await;
    StatusCode::NO_CONTENT
}

/// Replace the archive with an exported array.
///
/// The body is taken as raw text so that malformed JSON is reported as
/// `{"success": false}` rather than rejected by the extractor.
pub async fn import_transcripts(
    State(state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<ImportResultDto>) {
    match state.transcripts.import(&body).await {
        Ok(imported) => (
            StatusCode::OK,
            Json(ImportResultDto {
                success: true,
                imported: Some(imported),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Transcript import rejected: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ImportResultDto {
                    success: false,
                    imported: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
