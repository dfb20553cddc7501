//! UseCase layer: one struct per room operation, plus the event router that
//! serializes them.

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod event_router;
pub mod get_room_state;
pub mod join_room;
pub mod load_messages;
pub mod send_message;
pub mod toggle_dnd;
pub mod transcript_archive;
pub mod update_color;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ImportError, RouterError, SessionError};
pub use event_router::{EventRouter, EventRouterHandle, RoomCommand, RoomUseCases};
pub use get_room_state::{GetRoomStateUseCase, RoomState};
pub use join_room::JoinRoomUseCase;
pub use load_messages::{HistoryPage, LoadMessagesUseCase};
pub use send_message::SendMessageUseCase;
pub use toggle_dnd::ToggleDndUseCase;
pub use transcript_archive::TranscriptArchiveUseCase;
pub use update_color::UpdateColorUseCase;

use crate::domain::{ConnectionRepository, MessagePusher, ServerEvent};

/// Fan an event out to every live connection.
///
/// Delivery is best effort; failures are logged and never retried.
async fn broadcast_to_all(
    connections: &dyn ConnectionRepository,
    pusher: &dyn MessagePusher,
    event: &ServerEvent,
) {
    let targets = connections.connection_ids().await;
    if let Err(e) = pusher.broadcast(targets, event).await {
        tracing::warn!("Failed to broadcast {}: {}", event.name(), e);
    }
}
