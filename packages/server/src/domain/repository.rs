//! Repository trait 定義
//!
//! Interfaces the use cases need from the room's state holders. Concrete
//! implementations live in the infrastructure layer.

use std::ops::Range;

use async_trait::async_trait;

use super::{
    Color, ColorMap, Connection, ConnectionId, Message, RepositoryError, Transcript, Username,
};

/// Live connections of the room, in registration order.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Add a connection
    async fn register(&self, connection: Connection);

    /// Set the do-not-disturb flag of exactly one connection
    async fn set_dnd(
        &self,
        connection_id: &ConnectionId,
        dnd: bool,
    ) -> Result<Connection, RepositoryError>;

    /// Update the color of every live connection using `username`.
    /// Returns how many connections were touched.
    async fn set_color_for_username(&self, username: &Username, color: &Color) -> usize;

    /// Remove and return a connection
    async fn deregister(&self, connection_id: &ConnectionId)
    -> Result<Connection, RepositoryError>;

    async fn find(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// Presence snapshot
    async fn snapshot(&self) -> Vec<Connection>;

    async fn connection_ids(&self) -> Vec<ConnectionId>;
}

/// Append-only message log.
#[async_trait]
pub trait MessageLogRepository: Send + Sync {
    /// Append to the tail and persist. Returns the new entry's index.
    ///
    /// A failed write is logged, not returned: the in-memory log keeps the
    /// entry even when disk does not.
    async fn append(&self, message: Message) -> usize;

    /// Current number of entries
    async fn count(&self) -> usize;

    /// Entries in `range`, oldest first. Out-of-bounds parts are dropped.
    async fn slice(&self, range: Range<usize>) -> Vec<Message>;
}

/// Username → color directory. Last write wins.
#[async_trait]
pub trait ColorDirectoryRepository: Send + Sync {
    async fn get(&self, username: &Username) -> Option<Color>;

    /// Store and persist; write failures are logged, not returned.
    async fn set(&self, username: Username, color: Color);

    async fn all(&self) -> ColorMap;
}

/// Saved transcripts, addressed by position.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    async fn list(&self) -> Vec<Transcript>;

    async fn get(&self, index: usize) -> Option<Transcript>;

    /// Returns the new transcript's index
    async fn push(&self, transcript: Transcript) -> usize;

    async fn remove(&self, index: usize) -> Option<Transcript>;

    async fn replace_all(&self, transcripts: Vec<Transcript>);
}
