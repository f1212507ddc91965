//! Recording relay - forwards speaking-test recordings to Telegram.
//!
//! The library backs the `recording-relay` binary:
//! - `config`: environment configuration, loaded once at startup
//! - `submission`: request parsing, defaults and message composition
//! - `telegram`: the messaging transport and its Bot API implementation
//! - `relay`: the request pipeline and its error taxonomy
//! - `web`: axum handlers and router
//!
//! ## Architecture
//!
//! ```text
//! Recording page → POST /api/sendRecording → RelayHandler → sendMessage → sendAudio → Telegram chat
//! ```

pub mod config;
pub mod relay;
pub mod submission;
pub mod telegram;
pub mod web;

// Re-export commonly used types
pub use config::{Config, TelegramCredentials};
pub use relay::{Dispatch, RelayError, RelayHandler, RelayReply};
pub use submission::{Submission, SubmissionRequest};
pub use telegram::{MessagingTransport, TelegramTransport, TransportError};
pub use web::AppState;
