//! Domain layer for the chat room.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod pagination;
pub mod persistence;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, ColorMap, Connection, Handshake, Message, SessionPhase, SystemMessage, Transcript,
};
pub use error::{
    HandshakeError, MessagePushError, PersistenceError, RepositoryError, ValueObjectError,
};
pub use event::{ClientEvent, ServerEvent};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use pagination::{page_bounds, page_newest_first};
pub use persistence::DocumentStore;
pub use repository::{
    ColorDirectoryRepository, ConnectionRepository, MessageLogRepository, TranscriptRepository,
};
pub use value_object::{Color, ConnectionId, PageNumber, PageSize, Username};
