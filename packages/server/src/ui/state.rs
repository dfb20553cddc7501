//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{EventRouterHandle, TranscriptArchiveUseCase};

/// Shared application state
pub struct AppState {
    /// All room traffic goes through the event router
    pub router: EventRouterHandle,
    pub transcripts: Arc<TranscriptArchiveUseCase>,
}
