//! Shared wiring for use case tests.

use std::sync::Arc;

use hatchat_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRepository, MessagePusher, Username,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        persistence::InMemoryDocumentStore,
        repository::{
            InMemoryConnectionRepository, PersistentColorDirectory, PersistentMessageLog,
        },
    },
};

pub(crate) const FIXED_MILLIS: i64 = 1_700_000_000_000;

pub(crate) fn username(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

/// In-memory room with a real pusher so tests can read encoded frames.
pub(crate) struct RoomFixture {
    pub connections: Arc<InMemoryConnectionRepository>,
    pub messages: Arc<PersistentMessageLog>,
    pub colors: Arc<PersistentColorDirectory>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub message_store: Arc<InMemoryDocumentStore>,
    pub clock: Arc<FixedClock>,
}

impl RoomFixture {
    pub async fn new() -> Self {
        let message_store = Arc::new(InMemoryDocumentStore::new("messages"));
        Self {
            connections: Arc::new(InMemoryConnectionRepository::new()),
            messages: Arc::new(PersistentMessageLog::load(message_store.clone()).await),
            colors: Arc::new(
                PersistentColorDirectory::load(Arc::new(InMemoryDocumentStore::new("colors")))
                    .await,
            ),
            pusher: Arc::new(WebSocketMessagePusher::default()),
            message_store,
            clock: Arc::new(FixedClock::from_millis(FIXED_MILLIS)),
        }
    }

    /// Register a connection directly, bypassing the connect use case
    pub async fn connect(&self, name: &str) -> (Connection, mpsc::UnboundedReceiver<String>) {
        let connection = Connection::new(ConnectionId::generate(), username(name), None);
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.register(connection.clone()).await;
        self.pusher.register_client(connection.id, tx).await;
        (connection, rx)
    }
}

/// Every frame currently queued for a connection, decoded
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// Names of the events in `frames`
pub(crate) fn event_names(frames: &[serde_json::Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|frame| frame["event"].as_str().unwrap())
        .collect()
}
