//! Server configuration.

use std::path::{Path, PathBuf};

use crate::domain::PageSize;

pub const MESSAGES_FILE: &str = "messages.json";
pub const COLORS_FILE: &str = "colors.json";
pub const TRANSCRIPTS_FILE: &str = "transcripts.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the persisted documents
    pub data_dir: PathBuf,
    pub page_size: PageSize,
    /// Keep everything in memory; nothing is read from or written to disk
    pub ephemeral: bool,
}

impl ServerConfig {
    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(MESSAGES_FILE)
    }

    pub fn colors_path(&self) -> PathBuf {
        self.data_dir.join(COLORS_FILE)
    }

    pub fn transcripts_path(&self) -> PathBuf {
        self.data_dir.join(TRANSCRIPTS_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            page_size: PageSize::default(),
            ephemeral: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_paths_live_in_data_dir() {
        let config = ServerConfig {
            data_dir: PathBuf::from("/var/lib/hatchat"),
            ..ServerConfig::default()
        };

        assert_eq!(
            config.messages_path(),
            PathBuf::from("/var/lib/hatchat/messages.json")
        );
        assert_eq!(
            config.colors_path(),
            PathBuf::from("/var/lib/hatchat/colors.json")
        );
        assert_eq!(
            config.transcripts_path(),
            PathBuf::from("/var/lib/hatchat/transcripts.json")
        );
    }
}
