//! Volatile `DocumentStore`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DocumentStore, PersistenceError};

/// Keeps the document in memory. Writes can be made to fail on demand.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    name: String,
    contents: Mutex<Option<String>>,
    quarantined: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_contents(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Mutex::new(Some(contents.into())),
            quarantined: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Last successfully saved document
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }

    /// Document most recently moved aside by `quarantine`
    pub async fn quarantined(&self) -> Option<String> {
        self.quarantined.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents.lock().await.clone())
    }

    async fn save(&self, contents: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Write {
                target: self.location(),
                reason: "simulated write failure".to_string(),
            });
        }
        *self.contents.lock().await = Some(contents.to_string());
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<String>, PersistenceError> {
        let Some(contents) = self.contents.lock().await.take() else {
            return Ok(None);
        };
        *self.quarantined.lock().await = Some(contents);
        Ok(Some(format!("{}.corrupt", self.location())))
    }

    fn location(&self) -> String {
        format!("memory:{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_write_keeps_previous_contents() {
        // given:
        let store = InMemoryDocumentStore::with_contents("messages", "[1]");
        store.set_fail_writes(true);

        // when:
        let result = store.save("[1,2]").await;

        // then:
        assert!(matches!(result, Err(PersistenceError::Write { .. })));
        assert_eq!(store.contents().await.as_deref(), Some("[1]"));

        store.set_fail_writes(false);
        store.save("[1,2]").await.unwrap();
        assert_eq!(store.contents().await.as_deref(), Some("[1,2]"));
    }
}
