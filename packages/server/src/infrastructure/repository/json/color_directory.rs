//! Durable username → color directory.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{Color, ColorDirectoryRepository, ColorMap, DocumentStore, Username},
    infrastructure::dto::conversion::{color_map_from_dto, color_map_to_dto},
};

use super::{load_document, persist_document, recover_from_load_error};

/// Color directory persisted as a flat JSON object.
pub struct PersistentColorDirectory {
    colors: Mutex<ColorMap>,
    store: Arc<dyn DocumentStore>,
}

impl PersistentColorDirectory {
    /// Load the directory once at startup; failures start an empty directory.
    pub async fn load(store: Arc<dyn DocumentStore>) -> Self {
        let colors = match load_document::<BTreeMap<String, String>>(store.as_ref()).await {
            Ok(stored) => {
                let colors = color_map_from_dto(stored);
                tracing::info!(
                    "Loaded {} user colors from {}",
                    colors.len(),
                    store.location()
                );
                colors
            }
            Err(e) => {
                recover_from_load_error(store.as_ref(), &e, "color directory").await;
                ColorMap::new()
            }
        };
        Self {
            colors: Mutex::new(colors),
            store,
        }
    }
}

#[async_trait]
impl ColorDirectoryRepository for PersistentColorDirectory {
    async fn get(&self, username: &Username) -> Option<Color> {
        self.colors.lock().await.get(username).cloned()
    }

    async fn set(&self, username: Username, color: Color) {
        let mut colors = self.colors.lock().await;
        tracing::debug!("Color of '{}' set to {}", username, color.as_str());
        colors.insert(username, color);

        if let Err(e) = persist_document(self.store.as_ref(), &color_map_to_dto(&colors)).await {
            tracing::warn!("Color directory is only held in memory: {}", e);
        }
    }

    async fn all(&self) -> ColorMap {
        self.colors.lock().await.clone()
    }
}
