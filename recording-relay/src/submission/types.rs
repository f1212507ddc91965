//! Submission types.
//!
//! `SubmissionRequest` mirrors the JSON the recording page posts;
//! `Submission` is the same data with every optional field defaulted.

use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_FIRST_NAME: &str = "Unknown";
pub const DEFAULT_SURNAME: &str = "Student";
pub const DEFAULT_GROUP: &str = "Unknown group";
pub const DEFAULT_SET_NAME: &str = "Unknown set";

/// Inbound request body.
///
/// Every field may be absent. Field names are camelCase on the wire.
/// Values are kept as raw JSON so that one field of an unexpected type
/// does not invalidate the others.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub first_name: Option<Value>,
    #[serde(default)]
    pub surname: Option<Value>,
    #[serde(default)]
    pub group: Option<Value>,
    #[serde(default)]
    pub set_name: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub time: Option<Value>,
    /// Base64-encoded recording
    #[serde(default, alias = "audioData")]
    pub audio_base64: Option<Value>,
}

impl SubmissionRequest {
    /// Parse a raw request body.
    ///
    /// An empty body, or one that is not a JSON object, yields an empty
    /// request so that it fails the required-field check rather than
    /// being rejected as malformed.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Self::default();
        }

        match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    body_length = body.len(),
                    "submission_body_unparseable"
                );
                Self::default()
            }
        }
    }
}

/// A submission with defaults applied. The audio stays base64-encoded
/// until it is about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub first_name: String,
    pub surname: String,
    pub group: String,
    pub set_name: String,
    pub date: String,
    pub time: String,
    pub audio_base64: String,
}

impl Submission {
    /// Apply defaults to every optional field.
    ///
    /// Returns `None` when the recording is missing, empty, or not a string.
    pub fn from_request(request: SubmissionRequest) -> Option<Self> {
        let audio_base64 = match request.audio_base64 {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return None,
        };

        Some(Submission {
            first_name: or_default(request.first_name, DEFAULT_FIRST_NAME),
            surname: or_default(request.surname, DEFAULT_SURNAME),
            group: or_default(request.group, DEFAULT_GROUP),
            set_name: or_default(request.set_name, DEFAULT_SET_NAME),
            date: or_default(request.date, ""),
            time: or_default(request.time, ""),
            audio_base64,
        })
    }
}

/// Render a field as text, or `None` if it is falsy
/// (`null`, `false`, `0`, `""`).
fn text_value(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64()
                    .filter(|f| *f != 0.0)
                    .map(|f| format!("{}", f))
            }
        }
        other => Some(other.to_string()),
    }
}

fn or_default(value: Option<Value>, default: &str) -> String {
    value
        .and_then(text_value)
        .unwrap_or_else(|| default.to_string())
}
