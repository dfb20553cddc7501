//! Repository implementations.
//!
//! - `inmemory`: live connection registry (never persisted)
//! - `json`: durable JSON-document backed log, color directory and archive

pub mod inmemory;
pub mod json;

pub use inmemory::InMemoryConnectionRepository;
pub use json::{PersistentColorDirectory, PersistentMessageLog, PersistentTranscriptArchive};
