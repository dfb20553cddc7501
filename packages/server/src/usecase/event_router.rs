//! Event router: the single owner of room mutations.
//!
//! Every connection task talks to the room through an [`EventRouterHandle`].
//! Commands are queued on one channel and handled one at a time by
//! [`EventRouter::run`], so two handlers never interleave on the room state
//! and each handler finishes its persistence write before the next command
//! starts.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ClientEvent, Connection, ConnectionId, Handshake, PusherChannel};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomStateUseCase,
    JoinRoomUseCase, LoadMessagesUseCase, RoomState, SendMessageUseCase, ToggleDndUseCase,
    UpdateColorUseCase,
    error::{RouterError, SessionError},
};

/// Use cases the router dispatches to
pub struct RoomUseCases {
    pub connect_participant: Arc<ConnectParticipantUseCase>,
    pub join_room: Arc<JoinRoomUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub load_messages: Arc<LoadMessagesUseCase>,
    pub update_color: Arc<UpdateColorUseCase>,
    pub toggle_dnd: Arc<ToggleDndUseCase>,
    pub disconnect_participant: Arc<DisconnectParticipantUseCase>,
    pub get_room_state: Arc<GetRoomStateUseCase>,
}

#[derive(Debug)]
pub enum RoomCommand {
    /// Handshake accepted; register the connection
    Connect {
        handshake: Handshake,
        sender: PusherChannel,
        reply: oneshot::Sender<Connection>,
    },
    /// Event from an active connection
    Client {
        connection_id: ConnectionId,
        event: ClientEvent,
    },
    /// Transport closed
    Disconnect { connection_id: ConnectionId },
    Inspect { reply: oneshot::Sender<RoomState> },
}

pub struct EventRouter {
    usecases: RoomUseCases,
    commands: mpsc::UnboundedReceiver<RoomCommand>,
}

/// Cloneable sender side of the router
#[derive(Clone)]
pub struct EventRouterHandle {
    commands: mpsc::UnboundedSender<RoomCommand>,
}

impl EventRouter {
    pub fn new(usecases: RoomUseCases) -> (Self, EventRouterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                usecases,
                commands: rx,
            },
            EventRouterHandle { commands: tx },
        )
    }

    /// Handle commands until every handle has been dropped
    pub async fn run(mut self) {
        tracing::debug!("Event router started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        tracing::debug!("Event router stopped");
    }

    async fn handle(&self, command: RoomCommand) {
        match command {
            RoomCommand::Connect {
                handshake,
                sender,
                reply,
            } => {
                let connection = self
                    .usecases
                    .connect_participant
                    .execute(handshake, sender)
                    .await;
                let connection_id = connection.id;
                if reply.send(connection).is_err() {
                    // The socket went away while we were registering it
                    tracing::debug!("Connect reply for {} dropped", connection_id);
                    self.disconnect(&connection_id).await;
                }
            }
            RoomCommand::Client {
                connection_id,
                event,
            } => self.dispatch(&connection_id, event).await,
            RoomCommand::Disconnect { connection_id } => self.disconnect(&connection_id).await,
            RoomCommand::Inspect { reply } => {
                let state = self.usecases.get_room_state.execute().await;
                let _ = reply.send(state);
            }
        }
    }

    async fn dispatch(&self, connection_id: &ConnectionId, event: ClientEvent) {
        if let Err(e) = self.try_dispatch(connection_id, event).await {
            tracing::warn!("Event from {} ignored: {}", connection_id, e);
        }
    }

    async fn try_dispatch(
        &self,
        connection_id: &ConnectionId,
        event: ClientEvent,
    ) -> Result<(), SessionError> {
        match event {
            ClientEvent::Join { claimed_username } => {
                self.usecases
                    .join_room
                    .execute(connection_id, claimed_username.as_ref())
                    .await?;
            }
            ClientEvent::Chat { message, image } => {
                self.usecases
                    .send_message
                    .execute(connection_id, message, image)
                    .await?;
            }
            ClientEvent::LoadMessages { page } => {
                self.usecases
                    .load_messages
                    .execute(connection_id, page)
                    .await?;
            }
            ClientEvent::UpdateColor { color } => {
                self.usecases
                    .update_color
                    .execute(connection_id, color)
                    .await?;
            }
            ClientEvent::ToggleDnd { dnd } => {
                self.usecases.toggle_dnd.execute(connection_id, dnd).await?;
            }
        }
        Ok(())
    }

    async fn disconnect(&self, connection_id: &ConnectionId) {
        if let Err(e) = self
            .usecases
            .disconnect_participant
            .execute(connection_id)
            .await
        {
            tracing::debug!("Disconnect of {} ignored: {}", connection_id, e);
        }
    }
}

impl EventRouterHandle {
    /// Register a connection and wait until it is part of the room
    pub async fn connect(
        &self,
        handshake: Handshake,
        sender: PusherChannel,
    ) -> Result<Connection, RouterError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Connect {
            handshake,
            sender,
            reply,
        })?;
        rx.await.map_err(|_| RouterError::Closed)
    }

    /// Queue an event; it is handled after everything queued before it
    pub fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RouterError> {
        self.send(RoomCommand::Client {
            connection_id,
            event,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RouterError> {
        self.send(RoomCommand::Disconnect { connection_id })
    }

    pub async fn room_state(&self) -> Result<RoomState, RouterError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Inspect { reply })?;
        rx.await.map_err(|_| RouterError::Closed)
    }

    fn send(&self, command: RoomCommand) -> Result<(), RouterError> {
        self.commands.send(command).map_err(|_| RouterError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Color, ConnectionRepository, Message, MessageLogRepository, PageNumber, PageSize},
        usecase::test_support::{RoomFixture, drain, event_names, username},
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    fn usecases(fixture: &RoomFixture) -> RoomUseCases {
        RoomUseCases {
            connect_participant: Arc::new(ConnectParticipantUseCase::new(
                fixture.connections.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
            )),
            join_room: Arc::new(JoinRoomUseCase::new(
                fixture.connections.clone(),
                fixture.messages.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
                fixture.clock.clone(),
            )),
            send_message: Arc::new(SendMessageUseCase::new(
                fixture.connections.clone(),
                fixture.messages.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
                fixture.clock.clone(),
            )),
            load_messages: Arc::new(LoadMessagesUseCase::new(
                fixture.connections.clone(),
                fixture.messages.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
                PageSize::default(),
            )),
            update_color: Arc::new(UpdateColorUseCase::new(
                fixture.connections.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
            )),
            toggle_dnd: Arc::new(ToggleDndUseCase::new(
                fixture.connections.clone(),
                fixture.pusher.clone(),
            )),
            disconnect_participant: Arc::new(DisconnectParticipantUseCase::new(
                fixture.connections.clone(),
                fixture.messages.clone(),
                fixture.colors.clone(),
                fixture.pusher.clone(),
                fixture.clock.clone(),
            )),
            get_room_state: Arc::new(GetRoomStateUseCase::new(
                fixture.connections.clone(),
                fixture.messages.clone(),
                fixture.colors.clone(),
            )),
        }
    }

    fn start(fixture: &RoomFixture) -> EventRouterHandle {
        let (router, handle) = EventRouter::new(usecases(fixture));
        tokio::spawn(router.run());
        handle
    }

    async fn join(
        handle: &EventRouterHandle,
        name: &str,
        color: Option<&str>,
    ) -> (Connection, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handshake = Handshake::parse(Some(name), color).unwrap();
        let connection = handle.connect(handshake, tx).await.unwrap();
        handle
            .dispatch(
                connection.id,
                ClientEvent::Join {
                    claimed_username: None,
                },
            )
            .unwrap();
        (connection, rx)
    }

    #[tokio::test]
    async fn test_session_lifecycle_events_in_order() {
        // テスト項目: 接続から切断までのイベントが順序通りに届く
        // given (前提条件):
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);
        let (alice, mut alice_rx) = join(&handle, "alice", None).await;
        let (bob, _bob_rx) = join(&handle, "bob", None).await;

        // when (操作):
        handle
            .dispatch(
                alice.id,
                ClientEvent::Chat {
                    message: "hi".to_string(),
                    image: None,
                },
            )
            .unwrap();
        handle.disconnect(bob.id).unwrap();
        let state = handle.room_state().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            event_names(&drain(&mut alice_rx)),
            vec![
                "update_users",
                "user_join",
                "update_users",
                "user_join",
                "chat_message",
                "user_leave"
            ]
        );
        assert_eq!(state.users, vec![fixture.connections.find(&alice.id).await.unwrap()]);
        // joined, joined, chat, left
        assert_eq!(state.total_messages, 4);
    }

    #[tokio::test]
    async fn test_disconnect_appends_exactly_one_left_message() {
        // テスト項目: 切断は presence から消え、退出メッセージはちょうど 1 件
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);
        let (alice, _rx) = join(&handle, "alice", None).await;

        handle.disconnect(alice.id).unwrap();
        handle.disconnect(alice.id).unwrap();
        let state = handle.room_state().await.unwrap();

        assert!(state.users.is_empty());
        let log = fixture.messages.slice(0..10).await;
        let left: Vec<_> = log
            .iter()
            .filter(|m| matches!(m, Message::System(s) if s.message == "alice left the chat"))
            .collect();
        assert_eq!(left.len(), 1);
    }

    #[tokio::test]
    async fn test_color_update_reaches_other_session_of_same_user() {
        // テスト項目: 同名の別セッションも次の色ブロードキャストで新しい色を受け取る
        // given:
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);
        let (first, _rx1) = join(&handle, "alice", None).await;
        let (_second, mut rx2) = join(&handle, "alice", None).await;
        drain(&mut rx2);

        // when:
        handle
            .dispatch(
                first.id,
                ClientEvent::UpdateColor {
                    color: Color::new("#abcdef".to_string()).unwrap(),
                },
            )
            .unwrap();
        let state = handle.room_state().await.unwrap();

        // then:
        let frames = drain(&mut rx2);
        assert_eq!(event_names(&frames), vec!["update_colors"]);
        assert_eq!(frames[0]["data"]["userColors"]["alice"], "#abcdef");
        assert_eq!(
            state.user_colors.get(&username("alice")).map(Color::as_str),
            Some("#abcdef")
        );
    }

    #[tokio::test]
    async fn test_dnd_toggle_is_per_connection() {
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);
        let (first, _rx1) = join(&handle, "alice", None).await;
        let (second, _rx2) = join(&handle, "alice", None).await;

        handle
            .dispatch(first.id, ClientEvent::ToggleDnd { dnd: true })
            .unwrap();
        let state = handle.room_state().await.unwrap();

        let dnd: Vec<(ConnectionId, bool)> = state.users.iter().map(|c| (c.id, c.dnd)).collect();
        assert_eq!(dnd, vec![(first.id, true), (second.id, false)]);
    }

    #[tokio::test]
    async fn test_history_goes_to_requester_only() {
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);
        let (alice, mut alice_rx) = join(&handle, "alice", None).await;
        let (_bob, mut bob_rx) = join(&handle, "bob", None).await;
        handle.room_state().await.unwrap();
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        handle
            .dispatch(
                alice.id,
                ClientEvent::LoadMessages {
                    page: PageNumber::FIRST,
                },
            )
            .unwrap();
        handle.room_state().await.unwrap();

        let frames = drain(&mut alice_rx);
        assert_eq!(event_names(&frames), vec!["chat_history"]);
        assert_eq!(frames[0]["data"]["totalMessages"], 2);
        assert_eq!(frames[0]["data"]["messages"][0]["message"], "bob joined the chat");
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_events_from_unknown_connection_are_ignored() {
        let fixture = RoomFixture::new().await;
        let handle = start(&fixture);

        handle
            .dispatch(
                ConnectionId::generate(),
                ClientEvent::Chat {
                    message: "ghost".to_string(),
                    image: None,
                },
            )
            .unwrap();
        let state = handle.room_state().await.unwrap();

        assert_eq!(state.total_messages, 0);
    }

    #[tokio::test]
    async fn test_handle_reports_closed_router() {
        let fixture = RoomFixture::new().await;
        let (router, handle) = EventRouter::new(usecases(&fixture));
        drop(router);

        assert_eq!(
            handle.disconnect(ConnectionId::generate()),
            Err(RouterError::Closed)
        );
        assert_eq!(handle.room_state().await, Err(RouterError::Closed));
    }
}
