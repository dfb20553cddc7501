//! UseCase: トランスクリプトの保存・参照・インポート
//!
//! Transcripts are opaque JSON documents saved by clients. They live in
//! their own archive and never touch the room's message log.

use std::sync::Arc;

use crate::domain::{Transcript, TranscriptRepository};

use super::error::ImportError;

pub struct TranscriptArchiveUseCase {
    transcripts: Arc<dyn TranscriptRepository>,
}

impl TranscriptArchiveUseCase {
    pub fn new(transcripts: Arc<dyn TranscriptRepository>) -> Self {
        Self { transcripts }
    }

    pub async fn list(&self) -> Vec<Transcript> {
        self.transcripts.list().await
    }

    pub async fn get(&self, index: usize) -> Option<Transcript> {
        self.transcripts.get(index).await
    }

    /// Returns the index the transcript was stored at
    pub async fn save(&self, transcript: Transcript) -> usize {
        let index = self.transcripts.push(transcript).await;
        tracing::info!("Transcript #{} saved", index);
        index
    }

    pub async fn delete(&self, index: usize) -> Option<Transcript> {
        let removed = self.transcripts.remove(index).await;
        if removed.is_some() {
            tracing::info!("Transcript #{} deleted", index);
        }
        removed
    }

    pub async fn delete_all(&self) {
        self.transcripts.replace_all(Vec::new()).await;
        tracing::info!("All transcripts deleted");
    }

    /// Replace the whole archive with `payload`.
    ///
    /// The payload must be a JSON array; anything else is rejected and the
    /// archive is left as it was.
    pub async fn import(&self, payload: &str) -> Result<usize, ImportError> {
        let value: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| ImportError::Malformed(e.to_string()))?;
        let serde_json::Value::Array(entries) = value else {
            return Err(ImportError::Malformed(format!(
                "expected an array, found {}",
                json_kind(&value)
            )));
        };

        let transcripts: Vec<Transcript> = entries.into_iter().map(Transcript::new).collect();
        let imported = transcripts.len();
        self.transcripts.replace_all(transcripts).await;
        tracing::info!("Imported {} transcript(s)", imported);
        Ok(imported)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
