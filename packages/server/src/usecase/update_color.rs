//! UseCase: 色の変更

use std::sync::Arc;

use crate::domain::{
    Color, ColorDirectoryRepository, ConnectionId, ConnectionRepository, MessagePusher,
    ServerEvent, Username,
};

use super::{broadcast_to_all, error::SessionError};

pub struct UpdateColorUseCase {
    connections: Arc<dyn ConnectionRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateColorUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        colors: Arc<dyn ColorDirectoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connections,
            colors,
            message_pusher,
        }
    }

    /// Store the color for the connection's username and broadcast the full
    /// directory. Every live connection sharing the username picks it up.
    /// Past messages keep the color they were sent with.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        color: Color,
    ) -> Result<Username, SessionError> {
        let connection = self
            .connections
            .find(connection_id)
            .await
            .ok_or_else(|| SessionError::ConnectionNotFound(connection_id.to_string()))?;
        let username = connection.username;

        self.colors.set(username.clone(), color.clone()).await;
        let touched = self
            .connections
            .set_color_for_username(&username, &color)
            .await;
        tracing::debug!(
            "'{}' changed color to {} ({} connection(s))",
            username,
            color.as_str(),
            touched
        );

        let event = ServerEvent::UpdateColors {
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
