//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientEvent, ConnectionId, Handshake, SessionPhase},
    infrastructure::dto::websocket::InboundEventDto,
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
    pub color: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let handshake = match Handshake::parse(query.username.as_deref(), query.color.as_deref()) {
        Ok(handshake) => handshake,
        Err(e) => {
            tracing::warn!("Connection refused: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, handshake)))
}

/// Spawns a task that drains the connection's channel into the WebSocket.
///
/// Frames are pushed here by the `MessagePusher`; the task ends when the
/// channel closes or the socket stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Decode a text frame. Unparseable frames are logged and dropped.
fn decode_client_event(connection_id: &ConnectionId, text: &str) -> Option<ClientEvent> {
    let dto = match serde_json::from_str::<InboundEventDto>(text) {
        Ok(dto) => dto,
        Err(e) => {
            tracing::warn!("Unparseable frame from {}: {}", connection_id, e);
            return None;
        }
    };
    match ClientEvent::try_from(dto) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("Invalid event from {}: {}", connection_id, e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, handshake: Handshake) {
    let mut phase = SessionPhase::default();
    let (tx, rx) = mpsc::unbounded_channel();

    let connection = match state.router.connect(handshake, tx).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    phase = phase.activate();
    let connection_id = connection.id;

    let (sender, mut receiver) = socket.split();
    let router = state.router.clone();

    // Spawn a task to route events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) if phase.accepts_events() => {
                    let Some(event) = decode_client_event(&connection_id, text.as_str()) else {
                        continue;
                    };
                    if router.dispatch(connection_id, event).is_err() {
                        phase = phase.disconnect();
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Connection {} requested close", connection_id);
                    phase = phase.disconnect();
                }
                _ => {}
            }

            if !phase.accepts_events() {
                break;
            }
        }
    });

    // Spawn a task to push room events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.router.disconnect(connection_id) {
        tracing::warn!("Failed to disconnect {}: {}", connection_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageNumber;

    #[test]
    fn test_decode_client_event() {
        let id = ConnectionId::generate();

        assert_eq!(
            decode_client_event(&id, r#"{"event":"load_messages","data":{"page":0}}"#),
            Some(ClientEvent::LoadMessages {
                page: PageNumber::FIRST
            })
        );
        assert_eq!(
            decode_client_event(&id, r#"{"event":"dnd_toggle","data":{"dnd":true}}"#),
            Some(ClientEvent::ToggleDnd { dnd: true })
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let id = ConnectionId::generate();

        assert_eq!(decode_client_event(&id, "hello"), None);
        assert_eq!(
            decode_client_event(&id, r#"{"event":"unknown","data":{}}"#),
            None
        );
        assert_eq!(
            decode_client_event(&id, r#"{"event":"update_color","data":{"color":"  "}}"#),
            None
        );
    }
}
