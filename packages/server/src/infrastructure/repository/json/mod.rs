//! JSON-document backed repositories.
//!
//! Each repository keeps its full state in memory and rewrites its document
//! through a `DocumentStore` after every mutation, while still holding its
//! lock, so writes land in mutation order.

pub mod color_directory;
pub mod message_log;
pub mod transcript;

pub use color_directory::PersistentColorDirectory;
pub use message_log::PersistentMessageLog;
pub use transcript::PersistentTranscriptArchive;

use serde::{Serialize, de::DeserializeOwned};

use crate::domain::{DocumentStore, PersistenceError};

/// Read and decode a document, or `T::default()` if none was stored yet
async fn load_document<T>(store: &dyn DocumentStore) -> Result<T, PersistenceError>
where
    T: DeserializeOwned + Default,
{
    match store.load().await? {
        None => Ok(T::default()),
        Some(contents) => serde_json::from_str(&contents).map_err(|e| PersistenceError::Decode {
            target: store.location(),
            reason: e.to_string(),
        }),
    }
}

/// Log a failed startup load and, when the stored document is undecodable,
/// move it aside so the first save does not overwrite it
async fn recover_from_load_error(
    store: &dyn DocumentStore,
    error: &PersistenceError,
    what: &str,
) {
    tracing::error!("{}; starting with an empty {}", error, what);
    if !matches!(error, PersistenceError::Decode { .. }) {
        return;
    }
    match store.quarantine().await {
        Ok(Some(moved_to)) => tracing::warn!("Unreadable {} kept at {}", what, moved_to),
        Ok(None) => {}
        Err(e) => tracing::error!("Could not set aside unreadable {}: {}", what, e),
    }
}

/// Encode and write a whole document
async fn persist_document<T>(store: &dyn DocumentStore, document: &T) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
{
    let contents = serde_json::to_string_pretty(document)
        .map_err(|e| PersistenceError::Encode(e.to_string()))?;
    store.save(&contents).await
}
