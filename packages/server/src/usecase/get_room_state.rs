//! UseCase: ルーム状態の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{
    ColorDirectoryRepository, ColorMap, Connection, ConnectionRepository, MessageLogRepository,
};

/// Point-in-time view of the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub users: Vec<Connection>,
    pub user_colors: ColorMap,
    pub total_messages: usize,
}

pub struct GetRoomStateUseCase {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageLogRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
}

impl GetRoomStateUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        messages: Arc<dyn MessageLogRepository>,
        colors: Arc<dyn ColorDirectoryRepository>,
    ) -> Self {
        Self {
            connections,
            messages,
            colors,
        }
    }

    pub async fn execute(&self) -> RoomState {
        RoomState {
            users: self.connections.snapshot().await,
            user_colors: self.colors.all().await,
            total_messages: self.messages.count().await,
        }
    }
}
