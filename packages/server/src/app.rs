//! Dependency wiring.
//!
//! Builds the stores, repositories, use cases and event router in
//! dependency order and hands them to the [`Server`].

use std::{path::Path, sync::Arc};

use hatchat_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    domain::{
        ColorDirectoryRepository, ConnectionRepository, DocumentStore, MessageLogRepository,
        MessagePusher,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        persistence::{InMemoryDocumentStore, JsonFileStore},
        repository::{
            InMemoryConnectionRepository, PersistentColorDirectory, PersistentMessageLog,
            PersistentTranscriptArchive,
        },
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, EventRouter,
        GetRoomStateUseCase, JoinRoomUseCase, LoadMessagesUseCase, RoomUseCases,
        SendMessageUseCase, ToggleDndUseCase, TranscriptArchiveUseCase, UpdateColorUseCase,
    },
};

fn document_store(
    config: &ServerConfig,
    path: &Path,
    empty_document: &'static str,
) -> Arc<dyn DocumentStore> {
    if config.ephemeral {
        Arc::new(InMemoryDocumentStore::new(path.display().to_string()))
    } else {
        Arc::new(JsonFileStore::new(path, empty_document))
    }
}

/// Load persisted state and wire up a ready-to-run server
pub async fn build_server(config: &ServerConfig) -> Server {
    if config.ephemeral {
        tracing::info!("Running ephemeral; nothing will be persisted");
    } else {
        tracing::info!("Data directory: {}", config.data_dir().display());
    }

    // 1. Repositories
    let connections: Arc<dyn ConnectionRepository> = Arc::new(InMemoryConnectionRepository::new());
    let messages: Arc<dyn MessageLogRepository> = Arc::new(
        PersistentMessageLog::load(document_store(config, &config.messages_path(), "[]")).await,
    );
    let colors: Arc<dyn ColorDirectoryRepository> = Arc::new(
        PersistentColorDirectory::load(document_store(config, &config.colors_path(), "{}")).await,
    );
    let transcripts = Arc::new(
        PersistentTranscriptArchive::load(document_store(
            config,
            &config.transcripts_path(),
            "[]",
        ))
        .await,
    );
    tracing::info!("{} message(s) in history", messages.count().await);

    // 2. MessagePusher
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 3. UseCases
    let usecases = RoomUseCases {
        connect_participant: Arc::new(ConnectParticipantUseCase::new(
            connections.clone(),
            colors.clone(),
            message_pusher.clone(),
        )),
        join_room: Arc::new(JoinRoomUseCase::new(
            connections.clone(),
            messages.clone(),
            colors.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        send_message: Arc::new(SendMessageUseCase::new(
            connections.clone(),
            messages.clone(),
            colors.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        load_messages: Arc::new(LoadMessagesUseCase::new(
            connections.clone(),
            messages.clone(),
            colors.clone(),
            message_pusher.clone(),
            config.page_size,
        )),
        update_color: Arc::new(UpdateColorUseCase::new(
            connections.clone(),
            colors.clone(),
            message_pusher.clone(),
        )),
        toggle_dnd: Arc::new(ToggleDndUseCase::new(
            connections.clone(),
            message_pusher.clone(),
        )),
        disconnect_participant: Arc::new(DisconnectParticipantUseCase::new(
            connections.clone(),
            messages.clone(),
            colors.clone(),
            message_pusher.clone(),
            clock,
        )),
        get_room_state: Arc::new(GetRoomStateUseCase::new(connections, messages, colors)),
    };
    let transcripts = Arc::new(TranscriptArchiveUseCase::new(transcripts));

    // 4. Event router and server
    let (router, handle) = EventRouter::new(usecases);
    Server::new(router, handle, transcripts)
}
