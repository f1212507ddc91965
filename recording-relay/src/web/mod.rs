//! Web server module.
//!
//! This module provides the HTTP surface of the relay:
//! - `POST /api/sendRecording` relays a recording to Telegram
//! - `GET /health` reports liveness
//!
//! Requests are handled independently; nothing is shared between them
//! except the read-only configuration and the HTTP client.

pub mod handlers;

pub use handlers::{
    health, router, send_recording, AppState, HealthResponse, MAX_BODY_BYTES,
    SEND_RECORDING_PATH,
};
