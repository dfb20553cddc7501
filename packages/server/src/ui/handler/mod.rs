//! Request handlers.

mod http;
mod websocket;

pub use http::{
    debug_room_state, delete_all_transcripts, delete_transcript, get_transcript, health_check,
    import_transcripts, list_transcripts, save_transcript,
};
pub use websocket::websocket_handler;
