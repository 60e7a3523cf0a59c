//! Raw-message request and response bodies.

use crate::error::Result;
use mailsmith_mime::Message;
use mailsmith_mime::encoding::{decode_base64url, encode_base64url};
use serde::{Deserialize, Serialize};

/// A whole encoded message, base64url-encoded without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// The encoded message.
    pub raw: String,
    /// Thread to add the message to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl RawMessage {
    /// Encodes a message. `Bcc` is never part of the encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if the message is invalid.
    pub fn encode(message: &Message) -> Result<Self> {
        Ok(Self::from_bytes(&message.to_bytes()?))
    }

    /// Wraps already encoded message bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            raw: encode_base64url(bytes),
            thread_id: None,
        }
    }

    /// Sets the thread id.
    #[must_use]
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Decodes the message bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if `raw` is not valid base64url.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(decode_base64url(&self.raw)?)
    }
}

/// Server's description of a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    /// Message id.
    pub id: String,
    /// Thread id.
    #[serde(default)]
    pub thread_id: String,
    /// Labels applied to the message.
    #[serde(default)]
    pub label_ids: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_unpadded_base64url() {
        let message = Message::new()
            .to("a@example.com")
            .bcc("b@example.com")
            .subject("s")
            .text_body("hi?>");
        let raw = RawMessage::encode(&message).unwrap();

        assert!(!raw.raw.contains(['=', '+', '/']));
        let bytes = raw.to_bytes().unwrap();
        assert_eq!(bytes, message.to_bytes().unwrap());
        assert!(!String::from_utf8(bytes).unwrap().contains("b@example.com"));
    }

    #[test]
    fn test_request_json() {
        let raw = RawMessage::from_bytes(b"To: <a@b.c>").with_thread_id("t1");
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"raw": "VG86IDxhQGIuYz4", "threadId": "t1"})
        );

        let json = serde_json::to_string(&RawMessage::from_bytes(b"x")).unwrap();
        assert_eq!(json, r#"{"raw":"eA"}"#);
    }

    #[test]
    fn test_sent_message_json() {
        let sent: SentMessage = serde_json::from_str(
            r#"{"id": "18c1", "threadId": "18c0", "labelIds": ["SENT"]}"#,
        )
        .unwrap();
        assert_eq!(sent.id, "18c1");
        assert_eq!(sent.thread_id, "18c0");
        assert_eq!(sent.label_ids, vec!["SENT"]);

        let sent: SentMessage = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(sent.label_ids.is_empty());
    }

    #[test]
    fn test_invalid_message_is_an_encode_error() {
        let err = RawMessage::encode(&Message::new().subject("s")).unwrap_err();
        assert!(matches!(err, crate::Error::Encode(_)));
    }
}
