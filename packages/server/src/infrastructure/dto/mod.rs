//! Data Transfer Objects (DTOs) for the chat server.
//!
//! DTOs are organized by protocol:
//! - `message`: message records, shared by the wire format and the log file
//! - `websocket`: WebSocket event envelopes
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod message;
pub mod websocket;
