//! UseCase: ルーム参加の通知
//!
//! Handles the explicit `user_join` event sent after the transport is up:
//! logs a system message and tells everyone who joined.

use std::sync::Arc;

use hatchat_shared::time::Clock;

use crate::domain::{
    ColorDirectoryRepository, ConnectionId, ConnectionRepository, Message, MessageLogRepository,
    MessagePusher, ServerEvent, Username,
};

use super::{broadcast_to_all, error::SessionError};

pub struct JoinRoomUseCase {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageLogRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        messages: Arc<dyn MessageLogRepository>,
        colors: Arc<dyn ColorDirectoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            messages,
            colors,
            message_pusher,
            clock,
        }
    }

    /// The registered username is authoritative; a different name claimed in
    /// the event payload is ignored.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        claimed_username: Option<&Username>,
    ) -> Result<Username, SessionError> {
        let connection = self
            .connections
            .find(connection_id)
            .await
            .ok_or_else(|| SessionError::ConnectionNotFound(connection_id.to_string()))?;
        let username = connection.username;

        if let Some(claimed) = claimed_username
            && claimed != &username
        {
            tracing::debug!(
                "Connection {} claimed '{}' but is registered as '{}'",
                connection_id,
                claimed,
                username
            );
        }

        self.messages
            .append(Message::joined(&username, self.clock.now()))
            .await;

        let event = ServerEvent::UserJoin {
            username: username.clone(),
            users: self.connections.snapshot().await,
            user_colors: self.colors.all().await,
        };
        broadcast_to_all(
            self.connections.as_ref(),
            self.message_pusher.as_ref(),
            &event,
        )
        .await;

        Ok(username)
    }
}
