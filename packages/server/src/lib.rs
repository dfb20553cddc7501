//! Single-room WebSocket chat server.
//!
//! Presence, a persisted append-only message log with paginated history,
//! and a username → color directory shared by every connection.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// wiring
pub mod app;
pub mod config;
