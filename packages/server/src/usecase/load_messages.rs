//! UseCase: 履歴のページ取得
//!
//! Replies to the requesting connection only. The page is computed against
//! the log length at request time; appends between two requests shift the
//! page boundaries, so consecutive pages may overlap or skip entries.

use std::sync::Arc;

use crate::domain::{
    ColorDirectoryRepository, ConnectionId, ConnectionRepository, Message, MessageLogRepository,
    MessagePusher, PageNumber, PageSize, ServerEvent, page_bounds, page_newest_first,
};

use super::error::SessionError;

/// One page of history, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    pub page: PageNumber,
    pub total_messages: usize,
}

pub struct LoadMessagesUseCase {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageLogRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    page_size: PageSize,
}

impl LoadMessagesUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        messages: Arc<dyn MessageLogRepository>,
        colors: Arc<dyn ColorDirectoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        page_size: PageSize,
    ) -> Self {
        Self {
            connections,
            messages,
            colors,
            message_pusher,
            page_size,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        page: PageNumber,
    ) -> Result<HistoryPage, SessionError> {
        if self.connections.find(connection_id).await.is_none() {
            return Err(SessionError::ConnectionNotFound(connection_id.to_string()));
        }

        let total_messages = self.messages.count().await;
        let range = page_bounds(total_messages, page, self.page_size);
        let messages = page_newest_first(self.messages.slice(range).await);

        let event = ServerEvent::ChatHistory {
            messages: messages.clone(),
            page,
            total_messages,
            user_colors: self.colors.all().await,
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &event).await {
            tracing::warn!("Failed to send history to {}: {}", connection_id, e);
        }

        Ok(HistoryPage {
            messages,
            page,
            total_messages,
        })
    }
}
