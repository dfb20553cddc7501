//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 接続の削除、退出メッセージの記録、残った参加者への通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：切断と user_leave の通知
//! - エッジケース：同じユーザー名の別セッションは残る
//! - 異常系：登録されていない接続の切断（二重切断）

use std::sync::Arc;

use hatchat_shared::time::Clock;

use crate::domain::{
    ColorDirectoryRepository, Connection, ConnectionId, ConnectionRepository, Message,
    MessageLogRepository, MessagePusher, ServerEvent,
};

use super::{broadcast_to_all, error::SessionError};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageLogRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - the removed connection
    /// * `Err(SessionError)` - the connection was already gone; nothing is
    ///   logged or broadcast in that case
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<Connection, SessionError> {
        let connection = self.connections.deregister(connection_id).await?;
        self.message_pusher.unregister_client(connection_id).await;
        tracing::info!(
            "'{}' disconnected ({})",
            connection.username,
            connection.id
        );

        self.messages
            .append(Message::left(&connection.username, self.clock.now()))
            .await;

        let event = ServerEvent::UserLeave {
            username: connection.username.clone(),
            users: self.connections.snapshot().await,
            user_colors: self.colors.all().await,
        };
        broadcast_to_all(
            self.connections.as_ref(),
            self.message_pusher.as_ref(),
            &event,
        )
        .await;

        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::SystemMessage,
        usecase::test_support::{RoomFixture, drain, event_names, username},
    };

    fn usecase(fixture: &RoomFixture) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(
            fixture.connections.clone(),
            fixture.messages.clone(),
            fixture.colors.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_participants() {
        // テスト項目: 切断すると退出メッセージが記録され、残りの参加者に user_leave が届く
        // given (前提条件):
        let fixture = RoomFixture::new().await;
        let (alice, mut alice_rx) = fixture.connect("alice").await;
        let (_bob, mut bob_rx) = fixture.connect("bob").await;

        // when (操作):
        let removed = usecase(&fixture).execute(&alice.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(removed.username, username("alice"));
        assert!(fixture.connections.find(&alice.id).await.is_none());

        let log = fixture.messages.slice(0..1).await;
        assert_eq!(
            log,
            vec![Message::System(SystemMessage {
                message: "alice left the chat".to_string(),
                timestamp: fixture.clock.now(),
            })]
        );

        // the departed connection receives nothing
        assert!(drain(&mut alice_rx).is_empty());
        let frames = drain(&mut bob_rx);
        assert_eq!(event_names(&frames), vec!["user_leave"]);
        assert_eq!(frames[0]["data"]["username"], "alice");
        let users = frames[0]["data"]["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], "bob");
    }

    #[tokio::test]
    async fn test_other_session_of_same_user_survives() {
        // テスト項目: 同名の別セッションは切断されない
        let fixture = RoomFixture::new().await;
        let (first, _rx1) = fixture.connect("alice").await;
        let (second, mut rx2) = fixture.connect("alice").await;

        usecase(&fixture).execute(&first.id).await.unwrap();

        assert!(fixture.connections.find(&second.id).await.is_some());
        let frames = drain(&mut rx2);
        assert_eq!(frames[0]["data"]["users"][0]["username"], "alice");
    }

    #[tokio::test]
    async fn test_double_disconnect_is_rejected() {
        // テスト項目: 二重切断はエラーとなり、退出メッセージも一度しか記録されない
        let fixture = RoomFixture::new().await;
        let (alice, _rx) = fixture.connect("alice").await;
        let usecase = usecase(&fixture);

        usecase.execute(&alice.id).await.unwrap();
        let second = usecase.execute(&alice.id).await;

        assert!(matches!(second, Err(SessionError::ConnectionNotFound(_))));
        assert_eq!(fixture.messages.count().await, 1);
    }

    #[tokio::test]
    async fn test_last_participant_leaves_empty_room() {
        let fixture = RoomFixture::new().await;
        let (alice, _rx) = fixture.connect("alice").await;

        usecase(&fixture).execute(&alice.id).await.unwrap();

        assert!(fixture.connections.snapshot().await.is_empty());
    }
}
