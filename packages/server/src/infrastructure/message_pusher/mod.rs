//! メッセージ送信（通知）の実装
//!
//! - `websocket`: per-connection channels drained by WebSocket writer tasks

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
