//! Telegram Bot API dispatch.
//!
//! The relay talks to Telegram only through [`MessagingTransport`], so the
//! handler can be driven by a fake in tests.

pub mod transport;
pub mod types;

pub use transport::{MessagingTransport, TelegramTransport, TransportError};
pub use types::{AudioAttachment, SendMessageRequest, TelegramResponse, AUDIO_MIME_TYPE};
