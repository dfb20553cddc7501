//! UseCase: メッセージ送信処理
//!
//! Builds a chat message with the sender's current color, appends it to the
//! log and broadcasts it to every connection, the sender included.

use std::sync::Arc;

use hatchat_shared::time::Clock;

use crate::domain::{
    ChatMessage, ColorDirectoryRepository, ConnectionId, ConnectionRepository, Message,
    MessageLogRepository, MessagePusher, ServerEvent,
};

use super::{broadcast_to_all, error::SessionError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageLogRepository>,
    colors: Arc<dyn ColorDirectoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - the message as appended and broadcast
    /// * `Err(SessionError)` - the sender is not registered
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        message: String,
        image: Option<String>,
    ) -> Result<ChatMessage, SessionError> {
        let sender = self
            .connections
            .find(connection_id)
            .await
            .ok_or_else(|| SessionError::ConnectionNotFound(connection_id.to_string()))?;

        // Snapshot of the sender's color at send time
        let color = match self.colors.get(&sender.username).await {
            Some(color) => Some(color),
            None => sender.color,
        };

        let chat = ChatMessage {
            username: sender.username,
            message,
            timestamp: self.clock.now(),
            color,
            image,
        };

        let index = self.messages.append(Message::Chat(chat.clone())).await;
        tracing::debug!("Message #{} from '{}' appended", index, chat.username);

        broadcast_to_all(
            self.connections.as_ref(),
            self.message_pusher.as_ref(),
            &ServerEvent::ChatMessage(chat.clone()),
        )
        .await;

        Ok(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Color, MockMessagePusher},
        usecase::test_support::{FIXED_MILLIS, RoomFixture, drain, username},
    };
    use mockall::predicate::*;

    fn usecase(fixture: &RoomFixture) -> SendMessageUseCase {
        SendMessageUseCase::new(
            fixture.connections.clone(),
            fixture.messages.clone(),
            fixture.colors.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: メッセージが履歴に追加され、送信者を含む全員に届く
        // given (前提条件):
        let fixture = RoomFixture::new().await;
        let (alice, mut alice_rx) = fixture.connect("alice").await;
        let (_bob, mut bob_rx) = fixture.connect("bob").await;

        // when (操作):
        let chat = usecase(&fixture)
            .execute(&alice.id, "Hello!".to_string(), None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(chat.username, username("alice"));
        assert_eq!(chat.timestamp.timestamp_millis(), FIXED_MILLIS);
        assert_eq!(
            fixture.messages.slice(0..1).await,
            vec![Message::Chat(chat)]
        );

        for frames in [drain(&mut alice_rx), drain(&mut bob_rx)] {
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["event"], "chat_message");
            assert_eq!(frames[0]["data"]["type"], "chat");
            assert_eq!(frames[0]["data"]["message"], "Hello!");
            assert_eq!(frames[0]["data"]["timestamp"], "2023-11-14T22:13:20.000Z");
        }
    }

    #[tokio::test]
    async fn test_message_keeps_color_snapshot() {
        // テスト項目: 送信後に色を変えても、記録済みメッセージの色は変わらない
        // given:
        let fixture = RoomFixture::new().await;
        let (alice, _rx) = fixture.connect("alice").await;
        let red = Color::new("#ff0000".to_string()).unwrap();
        fixture.colors.set(username("alice"), red.clone()).await;
        let first = usecase(&fixture)
            .execute(&alice.id, "before".to_string(), None)
            .await
            .unwrap();

        // when:
        fixture
            .colors
            .set(username("alice"), Color::new("#00ff00".to_string()).unwrap())
            .await;

        // then:
        assert_eq!(first.color, Some(red.clone()));
        let Message::Chat(stored) = &fixture.messages.slice(0..1).await[0] else {
            panic!("expected a chat message");
        };
        assert_eq!(stored.color, Some(red));
    }

    #[tokio::test]
    async fn test_image_only_message_is_accepted() {
        let fixture = RoomFixture::new().await;
        let (alice, mut rx) = fixture.connect("alice").await;

        let chat = usecase(&fixture)
            .execute(&alice.id, String::new(), Some("/uploads/cat.png".to_string()))
            .await
            .unwrap();

        assert_eq!(chat.image.as_deref(), Some("/uploads/cat.png"));
        assert_eq!(drain(&mut rx)[0]["data"]["image"], "/uploads/cat.png");
    }

    #[tokio::test]
    async fn test_blank_message_is_relayed_as_is() {
        // テスト項目: 本文が空白のみで画像もないメッセージも、そのまま記録・配信される
        // given:
        let fixture = RoomFixture::new().await;
        let (alice, mut rx) = fixture.connect("alice").await;

        // when:
        let chat = usecase(&fixture)
            .execute(&alice.id, "   ".to_string(), None)
            .await
            .unwrap();

        // then:
        assert_eq!(chat.message, "   ");
        assert_eq!(chat.image, None);
        assert_eq!(fixture.messages.count().await, 1);
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["message"], "   ");
    }

    #[tokio::test]
    async fn test_failed_write_still_delivers_message() {
        // テスト項目: 保存に失敗してもメッセージはメモリ上の履歴に残り、配信される
        // given:
        let fixture = RoomFixture::new().await;
        let (alice, mut rx) = fixture.connect("alice").await;
        usecase(&fixture)
            .execute(&alice.id, "persisted".to_string(), None)
            .await
            .unwrap();
        fixture.message_store.set_fail_writes(true);

        // when:
        usecase(&fixture)
            .execute(&alice.id, "memory only".to_string(), None)
            .await
            .unwrap();

        // then:
        assert_eq!(fixture.messages.count().await, 2);
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1]["data"]["message"], "memory only");

        let on_disk = fixture.message_store.contents().await.unwrap();
        assert!(on_disk.contains("persisted"));
        assert!(!on_disk.contains("memory only"));
    }

    #[tokio::test]
    async fn test_broadcast_targets_every_connection() {
        // テスト項目: ブロードキャスト対象は送信者を含む全接続
        // given:
        let fixture = RoomFixture::new().await;
        let (alice, _alice_rx) = fixture.connect("alice").await;
        let (bob, _bob_rx) = fixture.connect("bob").await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .with(eq(vec![alice.id, bob.id]), always())
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = SendMessageUseCase::new(
            fixture.connections.clone(),
            fixture.messages.clone(),
            fixture.colors.clone(),
            Arc::new(pusher),
            fixture.clock.clone(),
        );

        // when / then: the mock verifies targets on drop
        usecase
            .execute(&bob.id, "hi".to_string(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_sender_is_rejected() {
        let fixture = RoomFixture::new().await;

        let result = usecase(&fixture)
            .execute(&ConnectionId::generate(), "hi".to_string(), None)
            .await;

        assert!(matches!(
            result,
            Err(SessionError::ConnectionNotFound(_))
        ));
    }
}
