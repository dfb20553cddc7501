//! Durable message log.

use std::{ops::Range, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{DocumentStore, Message, MessageLogRepository, PersistenceError},
    infrastructure::dto::message::MessageDto,
};

use super::{load_document, persist_document, recover_from_load_error};

/// Append-only log persisted as a JSON array of message records.
pub struct PersistentMessageLog {
    messages: Mutex<Vec<Message>>,
    store: Arc<dyn DocumentStore>,
}

impl PersistentMessageLog {
    /// Load the log once at startup.
    ///
    /// Unreadable or undecodable storage is logged and the log starts empty.
    /// An undecodable document is moved aside first, so the next append
    /// starts a fresh document instead of overwriting it.
    pub async fn load(store: Arc<dyn DocumentStore>) -> Self {
        let messages = match read_messages(store.as_ref()).await {
            Ok(messages) => {
                tracing::info!(
                    "Loaded {} messages from {}",
                    messages.len(),
                    store.location()
                );
                messages
            }
            Err(e) => {
                recover_from_load_error(store.as_ref(), &e, "message log").await;
                Vec::new()
            }
        };
        Self {
            messages: Mutex::new(messages),
            store,
        }
    }
}

async fn read_messages(store: &dyn DocumentStore) -> Result<Vec<Message>, PersistenceError> {
    let records: Vec<MessageDto> = load_document(store).await?;
    records
        .into_iter()
        .map(Message::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PersistenceError::Decode {
            target: store.location(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl MessageLogRepository for PersistentMessageLog {
    async fn append(&self, message: Message) -> usize {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        let index = messages.len() - 1;

        let records: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();
        if let Err(e) = persist_document(self.store.as_ref(), &records).await {
            tracing::warn!("Message #{} is only held in memory: {}", index, e);
        }
        index
    }

    async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }

    async fn slice(&self, range: Range<usize>) -> Vec<Message> {
        let messages = self.messages.lock().await;
        let end = range.end.min(messages.len());
        let start = range.start.min(end);
        messages[start..end].to_vec()
    }
}
