//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod chat;
mod instance;
mod message;

pub use chat::{decode_whatsapp_numbers_response, encode_whatsapp_numbers_body};
pub use instance::{
    decode_connect_response, decode_connection_state_response, decode_fetch_instances_response,
    encode_create_instance_body, encode_presence_body, fetch_instances_path, instance_connect_path,
};
pub use message::{
    encode_audio_body, encode_contact_body, encode_location_body, encode_poll_body,
    encode_reaction_body, encode_sticker_body, encode_text_body,
};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    Lines(Vec<String>),
    Other(serde_json::Value),
}

/// Best-effort operator-facing message for a non-2xx response.
///
/// Uses the body's top-level `message` (a string, or a list of strings joined with `; `)
/// and falls back to `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .and_then(|message| match message {
            ErrorMessage::Text(text) => Some(text),
            ErrorMessage::Lines(lines) => Some(lines.join("; ")),
            ErrorMessage::Other(_) => None,
        })
        .filter(|message| !message.trim().is_empty());

    message.unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::extract_error_message;

    #[test]
    fn error_message_prefers_body_message() {
        assert_eq!(
            extract_error_message(401, r#"{"status":401,"message":"Unauthorized"}"#),
            "Unauthorized"
        );
    }

    #[test]
    fn error_message_joins_message_lists() {
        assert_eq!(
            extract_error_message(400, r#"{"message":["number is invalid","text is empty"]}"#),
            "number is invalid; text is empty"
        );
    }

    #[test]
    fn error_message_falls_back_to_http_status() {
        assert_eq!(extract_error_message(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(extract_error_message(500, r#"{"error":"boom"}"#), "HTTP 500");
        assert_eq!(extract_error_message(500, r#"{"message":""}"#), "HTTP 500");
        assert_eq!(extract_error_message(404, r#"{"message":{"a":1}}"#), "HTTP 404");
        assert_eq!(extract_error_message(503, ""), "HTTP 503");
    }
}
