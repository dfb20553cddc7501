//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{EventRouter, EventRouterHandle, TranscriptArchiveUseCase};

use super::{
    handler::{
        debug_room_state, delete_all_transcripts, delete_transcript, get_transcript,
        health_check, import_transcripts, list_transcripts, save_transcript, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// Owns the event router until it is started; the router task runs for as
/// long as the server does.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(router, handle, transcripts);
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    router: EventRouter,
    handle: EventRouterHandle,
    transcripts: Arc<TranscriptArchiveUseCase>,
}

impl Server {
    pub fn new(
        router: EventRouter,
        handle: EventRouterHandle,
        transcripts: Arc<TranscriptArchiveUseCase>,
    ) -> Self {
        Self {
            router,
            handle,
            transcripts,
        }
    }

    /// Run the WebSocket chat server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws?username=<name>", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router_task = tokio::spawn(self.router.run());

        let app_state = Arc::new(AppState {
            router: self.handle,
            transcripts: self.transcripts,
        });

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/debug/room", get(debug_room_state))
            .route(
                "/api/transcripts",
                get(list_transcripts)
                    .post(save_transcript)
                    .delete(delete_all_transcripts),
            )
            .route("/api/transcripts/import", post(import_transcripts))
            .route(
                "/api/transcripts/{index}",
                get(get_transcript).delete(delete_transcript),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        // Sockets still open at shutdown keep router handles alive
        router_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
