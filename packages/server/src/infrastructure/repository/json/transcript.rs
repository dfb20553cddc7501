//! Durable transcript archive.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DocumentStore, Transcript, TranscriptRepository};

use super::{load_document, persist_document, recover_from_load_error};

/// Saved transcripts persisted as a JSON array.
pub struct PersistentTranscriptArchive {
    transcripts: Mutex<Vec<Transcript>>,
    store: Arc<dyn DocumentStore>,
}

impl PersistentTranscriptArchive {
    pub async fn load(store: Arc<dyn DocumentStore>) -> Self {
        let transcripts = match load_document::<Vec<serde_json::Value>>(store.as_ref()).await {
            Ok(stored) => stored.into_iter().map(Transcript::new).collect(),
            Err(e) => {
                recover_from_load_error(store.as_ref(), &e, "transcript archive").await;
                Vec::new()
            }
        };
        Self {
            transcripts: Mutex::new(transcripts),
            store,
        }
    }

    async fn persist(&self, transcripts: &[Transcript]) {
        let document: Vec<&serde_json::Value> =
            transcripts.iter().map(Transcript::as_json).collect();
        if let Err(e) = persist_document(self.store.as_ref(), &document).await {
            tracing::warn!("Transcript archive is only held in memory: {}", e);
        }
    }
}

#[async_trait]
impl TranscriptRepository for PersistentTranscriptArchive {
    async fn list(&self) -> Vec<Transcript> {
        self.transcripts.lock().await.clone()
    }

    async fn get(&self, index: usize) -> Option<Transcript> {
        self.transcripts.lock().await.get(index).cloned()
    }

    async fn push(&self, transcript: Transcript) -> usize {
        let mut transcripts = self.transcripts.lock().await;
        transcripts.push(transcript);
        self.persist(&transcripts).await;
        transcripts.len() - 1
    }

    async fn remove(&self, index: usize) -> Option<Transcript> {
        let mut transcripts = self.transcripts.lock().await;
        if index >= transcripts.len() {
            return None;
        }
        let removed = transcripts.remove(index);
        self.persist(&transcripts).await;
        Some(removed)
    }

    async fn replace_all(&self, replacement: Vec<Transcript>) {
        let mut transcripts = self.transcripts.lock().await;
        *transcripts = replacement;
        self.persist(&transcripts).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_push_get_remove() {
        // given:
        let store = Arc::new(InMemoryDocumentStore::new("transcripts"));
        let archive = PersistentTranscriptArchive::load(store.clone()).await;

        // when:
        let first = archive.push(Transcript::new(json!({"title": "monday"}))).await;
        let second = archive.push(Transcript::new(json!({"title": "tuesday"}))).await;

        // then:
        assert_eq!((first, second), (0, 1));
        assert_eq!(
            archive.get(1).await.map(Transcript::into_json),
            Some(json!({"title": "tuesday"}))
        );

        let removed = archive.remove(0).await;
        assert_eq!(removed.map(Transcript::into_json), Some(json!({"title": "monday"})));
        assert_eq!(archive.list().await.len(), 1);
        assert_eq!(archive.remove(5).await, None);

        let stored: serde_json::Value =
            serde_json::from_str(&store.contents().await.unwrap()).unwrap();
        assert_eq!(stored, json!([{"title": "tuesday"}]));
    }

    #[tokio::test]
    async fn test_loads_existing_archive() {
        let store = Arc::new(InMemoryDocumentStore::with_contents(
            "transcripts",
            r#"[{"title":"a"},{"title":"b"}]"#,
        ));

        let archive = PersistentTranscriptArchive::load(store).await;

        assert_eq!(archive.list().await.len(), 2);
    }
}
