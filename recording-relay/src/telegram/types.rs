//! Bot API request and response shapes.

use serde::{Deserialize, Serialize};

/// MIME type of every uploaded recording.
pub const AUDIO_MIME_TYPE: &str = "audio/webm";

/// JSON body of `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Envelope wrapped around every Bot API response.
///
/// `ok` is the acknowledgment flag; on failure Telegram fills
/// `error_code` and `description`.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A recording ready to be uploaded with `sendAudio`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAttachment {
    pub filename: String,
    pub mime_type: &'static str,
    pub caption: String,
    pub bytes: Vec<u8>,
}

impl AudioAttachment {
    pub fn webm(filename: String, caption: String, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            mime_type: AUDIO_MIME_TYPE,
            caption,
            bytes,
        }
    }
}
