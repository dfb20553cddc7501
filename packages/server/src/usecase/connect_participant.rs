//! UseCase: 参加者接続処理
//!
//! Registers a handshake-validated connection, seeds its color from (or
//! into) the color directory and broadcasts the new presence snapshot.

use std::sync::Arc;

use crate::domain::{
    ColorDirectoryRepository, Connection, ConnectionId, ConnectionRepository, Handshake,
    MessagePusher, PusherChannel, ServerEvent,
};

use super::broadcast_to_all;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    connections: Arc<dyn ConnectionRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
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

    /// 参加者接続を実行
    ///
    /// A color passed at handshake overwrites the stored one; otherwise the
    /// stored color (if any) is used.
    pub async fn execute(&self, handshake: Handshake, sender: PusherChannel) -> Connection {
        let Handshake { username, color } = handshake;

        let color = match color {
            Some(color) => {
                self.colors.set(username.clone(), color.clone()).await;
                self.connections
                    .set_color_for_username(&username, &color)
                    .await;
                Some(color)
            }
            None => self.colors.get(&username).await,
        };

        let connection = Connection::new(ConnectionId::generate(), username, color);
        self.connections.register(connection.clone()).await;
        self.message_pusher
            .register_client(connection.id, sender)
            .await;
        tracing::info!(
            "'{}' connected as {}",
            connection.username,
            connection.id
        );

        let users = self.connections.snapshot().await;
        broadcast_to_all(
            self.connections.as_ref(),
            self.message_pusher.as_ref(),
            &ServerEvent::UpdateUsers { users },
        )
        .await;

        connection
    }
}
