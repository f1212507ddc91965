//! Recording relay - the request pipeline.
//!
//! One request is handled in a fixed order, stopping at the first failure:
//!
//! ```text
//! method check → credentials check → defaults/validation → sendMessage → sendAudio
//! ```
//!
//! Method, configuration and validation failures get their own response.
//! Every later failure is logged in full and reported to the caller as a
//! single generic error.

use std::fmt;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{Config, TelegramCredentials};
use crate::submission::{
    audio_caption, audio_filename, compose_message, Submission, SubmissionRequest,
};
use crate::telegram::{AudioAttachment, MessagingTransport, TransportError};

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const CONFIGURATION_MESSAGE: &str = "Telegram environment variables are not configured.";
pub const AUDIO_REQUIRED_MESSAGE: &str = "audioBase64 is required.";
pub const RELAY_FAILED_MESSAGE: &str = "Failed to send recording to Telegram.";

/// Decoder for uploaded audio: padding optional, trailing bits ignored.
const AUDIO_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 recording as browsers and Node produce it.
///
/// ASCII whitespace (line wrapping) is dropped and the URL-safe
/// characters `-` and `_` are read as `+` and `/`.
pub fn decode_audio(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| match b {
            b'-' => b'+',
            b'_' => b'/',
            other => other,
        })
        .collect();

    AUDIO_BASE64.decode(normalized)
}

/// Which of the two outbound calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Message,
    Audio,
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Message => f.write_str("message"),
            Dispatch::Audio => f.write_str("audio"),
        }
    }
}

/// Everything that can stop a relay request.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("Telegram credentials are not configured")]
    Configuration,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("audio payload is not valid base64: {0}")]
    InvalidAudio(#[from] base64::DecodeError),

    #[error("failed to send {dispatch} to Telegram: {source}")]
    Upstream {
        dispatch: Dispatch,
        #[source]
        source: TransportError,
    },
}

impl RelayError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration
            | RelayError::InvalidAudio(_)
            | RelayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error text reported to the caller. Upstream details are never exposed.
    pub fn client_message(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE,
            RelayError::Configuration => CONFIGURATION_MESSAGE,
            RelayError::Validation(_) => AUDIO_REQUIRED_MESSAGE,
            RelayError::InvalidAudio(_) | RelayError::Upstream { .. } => RELAY_FAILED_MESSAGE,
        }
    }
}

/// Response body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayReply {
    Sent { ok: bool },
    Failed { error: &'static str },
}

/// Relays recorded submissions to the configured Telegram chat.
#[derive(Clone)]
pub struct RelayHandler {
    config: Arc<Config>,
    transport: Arc<dyn MessagingTransport>,
}

impl RelayHandler {
    pub fn new(config: Arc<Config>, transport: Arc<dyn MessagingTransport>) -> Self {
        Self { config, transport }
    }

    /// Handle one request and produce the status and body to send back.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> (StatusCode, RelayReply) {
        match self.relay(method, body).await {
            Ok(()) => (StatusCode::OK, RelayReply::Sent { ok: true }),
            Err(e) => {
                match &e {
                    RelayError::MethodNotAllowed => {
                        warn!(method = %method, "recording_method_not_allowed");
                    }
                    RelayError::Configuration => {
                        error!("recording_relay_not_configured");
                    }
                    RelayError::Validation(reason) => {
                        warn!(reason = %reason, "recording_validation_failed");
                    }
                    RelayError::InvalidAudio(_) | RelayError::Upstream { .. } => {
                        error!(error = %e, "recording_relay_failed");
                    }
                }

                (
                    e.status(),
                    RelayReply::Failed {
                        error: e.client_message(),
                    },
                )
            }
        }
    }

    /// Run the pipeline, returning the first error encountered.
    pub async fn relay(&self, method: &Method, body: &[u8]) -> Result<(), RelayError> {
        if *method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let credentials = self
            .config
            .telegram_credentials()
            .ok_or(RelayError::Configuration)?;

        let submission = Submission::from_request(SubmissionRequest::from_body(body))
            .ok_or_else(|| RelayError::Validation("audioBase64 is required".to_string()))?;

        info!(
            first_name = %submission.first_name,
            surname = %submission.surname,
            group = %submission.group,
            set_name = %submission.set_name,
            audio_base64_length = submission.audio_base64.len(),
            "recording_received"
        );

        self.dispatch(&credentials, &submission).await?;

        info!(
            first_name = %submission.first_name,
            surname = %submission.surname,
            "recording_relayed"
        );

        Ok(())
    }

    async fn dispatch(
        &self,
        credentials: &TelegramCredentials,
        submission: &Submission,
    ) -> Result<(), RelayError> {
        let message = compose_message(submission);
        self.transport
            .send_text(credentials, &message)
            .await
            .map_err(|source| RelayError::Upstream {
                dispatch: Dispatch::Message,
                source,
            })?;

        let bytes = decode_audio(&submission.audio_base64)?;
        let attachment =
            AudioAttachment::webm(audio_filename(submission), audio_caption(submission), bytes);

        self.transport
            .send_file(credentials, attachment)
            .await
            .map_err(|source| RelayError::Upstream {
                dispatch: Dispatch::Audio,
                source,
            })?;

        Ok(())
    }
}
