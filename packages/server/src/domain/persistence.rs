//! Durable document storage capability.
//!
//! Each persisted structure (message log, color directory, transcript
//! archive) is one document that is rewritten wholesale on every mutation.

use async_trait::async_trait;

use super::PersistenceError;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the stored document.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet; implementations
    /// create the backing storage in that case.
    async fn load(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored document. Returns once the write completed or failed.
    async fn save(&self, contents: &str) -> Result<(), PersistenceError>;

    /// Move the stored document out of the way, keeping its contents.
    ///
    /// Used when the document cannot be decoded, so the next `save` does not
    /// destroy it. Returns where it was moved, or `None` if nothing was stored.
    async fn quarantine(&self) -> Result<Option<String>, PersistenceError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}
