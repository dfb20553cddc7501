//! UseCase: おやすみモード（DND）の切り替え

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, MessagePusher, ServerEvent,
};

use super::{broadcast_to_all, error::SessionError};

pub struct ToggleDndUseCase {
    connections: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ToggleDndUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
        }
    }

    /// Set the flag on this connection only, then broadcast presence.
    ///
    /// The flag is informational; delivery to a DND connection is unchanged.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        dnd: bool,
    ) -> Result<Connection, SessionError> {
        let connection = self.connections.set_dnd(connection_id, dnd).await?;
        tracing::debug!("'{}' set dnd={}", connection.username, dnd);

        let users = self.connections.snapshot().await;
        broadcast_to_all(
            self.connections.as_ref(),
            self.message_pusher.as_ref(),
            &ServerEvent::UpdateUsers { users },
        )
        .await;

        Ok(connection)
    }
}
