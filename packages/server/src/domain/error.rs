//! Domain errors.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("color must not be empty")]
    EmptyColor,

    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("invalid connection id: {0}")]
    InvalidConnectionId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Handshake rejected; the transport must refuse the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("handshake is missing a username")]
    MissingUsername,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
}

/// Durable storage errors.
///
/// None of these are fatal: load failures fall back to an empty document and
/// write failures leave the in-memory state ahead of disk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("failed to read {target}: {reason}")]
    Read { target: String, reason: String },

    #[error("failed to write {target}: {reason}")]
    Write { target: String, reason: String },

    #[error("failed to encode document: {0}")]
    Encode(String),

    #[error("failed to decode {target}: {reason}")]
    Decode { target: String, reason: String },
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}
