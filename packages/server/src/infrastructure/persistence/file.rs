//! Whole-document JSON file store.
//!
//! Every save writes the full document to `<file>.tmp`, flushes it to disk,
//! renames it over the target and then flushes the parent directory. Once
//! `save` returns `Ok`, the new document survives a crash or power loss; a
//! crash before that leaves the previous document intact.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt};

use crate::domain::{DocumentStore, PersistenceError};

pub struct JsonFileStore {
    path: PathBuf,
    /// Written when the file does not exist yet (e.g. `[]` or `{}`)
    empty_document: &'static str,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, empty_document: &'static str) -> Self {
        Self {
            path: path.into(),
            empty_document,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    async fn write_atomically(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp, &self.path).await?;
        self.sync_parent_dir().await
    }

    /// Flush directory entries changed by the last rename
    #[cfg(unix)]
    async fn sync_parent_dir(&self) -> std::io::Result<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        fs::File::open(dir).await?.sync_all().await
    }

    #[cfg(not(unix))]
    async fn sync_parent_dir(&self) -> std::io::Result<()> {
        Ok(())
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
        PathBuf::from(name)
    }

    fn write_error(&self, e: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            target: self.location(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No document at {}, creating an empty one",
                    self.path.display()
                );
                self.write_atomically(self.empty_document)
                    .await
                    .map_err(|e| self.write_error(e))?;
                Ok(None)
            }
            Err(e) => Err(PersistenceError::Read {
                target: self.location(),
                reason: e.to_string(),
            }),
        }
    }

    async fn save(&self, contents: &str) -> Result<(), PersistenceError> {
        self.write_atomically(contents)
            .await
            .map_err(|e| self.write_error(e))
    }

    async fn quarantine(&self) -> Result<Option<String>, PersistenceError> {
        let target = self.quarantine_path();
        match fs::rename(&self.path, &target).await {
            Ok(()) => {
                self.sync_parent_dir()
                    .await
                    .map_err(|e| self.write_error(e))?;
                Ok(Some(target.display().to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
