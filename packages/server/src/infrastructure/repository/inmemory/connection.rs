//! InMemory Connection Repository 実装
//!
//! The registry of live connections. Entries are kept in registration order
//! so presence snapshots are stable between broadcasts.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Color, Connection, ConnectionId, ConnectionRepository, RepositoryError, Username,
};

#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<Vec<Connection>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(connection_id: &ConnectionId) -> RepositoryError {
    RepositoryError::ConnectionNotFound(connection_id.to_string())
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) {
        let mut connections = self.connections.lock().await;
        tracing::debug!(
            "Registering connection {} for '{}'",
            connection.id,
            connection.username
        );
        connections.push(connection);
    }

    async fn set_dnd(
        &self,
        connection_id: &ConnectionId,
        dnd: bool,
    ) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .iter_mut()
            .find(|c| &c.id == connection_id)
            .ok_or_else(|| not_found(connection_id))?;
        connection.dnd = dnd;
        Ok(connection.clone())
    }

    async fn set_color_for_username(&self, username: &Username, color: &Color) -> usize {
        let mut connections = self.connections.lock().await;
        let mut touched = 0;
        for connection in connections.iter_mut().filter(|c| &c.username == username) {
            connection.color = Some(color.clone());
            touched += 1;
        }
        touched
    }

    async fn deregister(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let position = connections
            .iter()
            .position(|c| &c.id == connection_id)
            .ok_or_else(|| not_found(connection_id))?;
        Ok(connections.remove(position))
    }

    async fn find(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.iter().find(|c| &c.id == connection_id).cloned()
    }

    async fn snapshot(&self) -> Vec<Connection> {
        self.connections.lock().await.clone()
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        connections.iter().map(|c| c.id).collect()
    }
}
