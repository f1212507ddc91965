//! Outbound calls to the Telegram Bot API.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use tracing::{error, info};
use url::Url;

use super::types::{AudioAttachment, SendMessageRequest, TelegramResponse};
use crate::config::TelegramCredentials;

/// Errors from a single Bot API call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or its response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Telegram answered, but without acknowledging the call.
    #[error("rejected by Telegram (status {status}, error_code {error_code:?}): {description}")]
    Rejected {
        status: u16,
        error_code: Option<i64>,
        description: String,
    },
}

/// The two operations the relay needs from a messaging service.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Post a text message to the configured chat.
    async fn send_text(
        &self,
        credentials: &TelegramCredentials,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Upload a recording to the configured chat.
    async fn send_file(
        &self,
        credentials: &TelegramCredentials,
        attachment: AudioAttachment,
    ) -> Result<(), TransportError>;
}

/// [`MessagingTransport`] backed by the real Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    api_url: String,
}

impl TelegramTransport {
    /// Create a transport that calls the Bot API at `api_url`.
    pub fn new(client: Client, api_url: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(api_url)?;

        Ok(Self {
            client,
            api_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, bot_token, method)
    }
}

#[async_trait]
impl MessagingTransport for TelegramTransport {
    async fn send_text(
        &self,
        credentials: &TelegramCredentials,
        text: &str,
    ) -> Result<(), TransportError> {
        let body = SendMessageRequest {
            chat_id: &credentials.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.method_url(&credentials.bot_token, "sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        check_acknowledged(response, "sendMessage").await?;

        info!(
            chat_id = %credentials.chat_id,
            text_length = text.len(),
            "telegram_message_sent"
        );

        Ok(())
    }

    async fn send_file(
        &self,
        credentials: &TelegramCredentials,
        attachment: AudioAttachment,
    ) -> Result<(), TransportError> {
        let size = attachment.bytes.len();
        let filename = attachment.filename.clone();

        let audio = Part::bytes(attachment.bytes)
            .file_name(attachment.filename)
            .mime_str(attachment.mime_type)?;

        let form = Form::new()
            .text("chat_id", credentials.chat_id.clone())
            .part("audio", audio)
            .text("caption", attachment.caption);

        let response = self
            .client
            .post(self.method_url(&credentials.bot_token, "sendAudio"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        check_acknowledged(response, "sendAudio").await?;

        info!(
            chat_id = %credentials.chat_id,
            filename = %filename,
            audio_bytes = size,
            "telegram_audio_sent"
        );

        Ok(())
    }
}

/// Succeed only on an HTTP success status with `ok: true` in the body.
async fn check_acknowledged(response: Response, method: &str) -> Result<(), TransportError> {
    let status = response.status();
    let body = response.bytes().await.map_err(|e| e.without_url())?;

    let rejection = match serde_json::from_slice::<TelegramResponse>(&body) {
        Ok(envelope) if status.is_success() && envelope.ok => return Ok(()),
        Ok(envelope) => TransportError::Rejected {
            status: status.as_u16(),
            error_code: envelope.error_code,
            description: envelope.description.unwrap_or_default(),
        },
        Err(_) => TransportError::Rejected {
            status: status.as_u16(),
            error_code: None,
            description: format!(
                "unparseable response: {}",
                String::from_utf8_lossy(&body).chars().take(200).collect::<String>()
            ),
        },
    };

    error!(
        method = method,
        status_code = status.as_u16(),
        error = %rejection,
        "telegram_api_rejected"
    );

    Err(rejection)
}
