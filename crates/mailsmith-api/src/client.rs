//! Authenticated client for the raw-message send endpoint.

use crate::error::{ErrorResponse, Result};
use crate::raw::{RawMessage, SentMessage};
use mailsmith_mime::Message;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info};
use url::Url;

/// Gmail's send endpoint for the authenticated user.
pub const DEFAULT_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Sends encoded messages with a bearer access token.
#[derive(Clone)]
pub struct MailApiClient {
    access_token: String,
    endpoint: Url,
    http_client: Client,
}

impl MailApiClient {
    /// Creates a client for [`DEFAULT_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be parsed.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            access_token: access_token.into(),
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
            http_client: Client::new(),
        })
    }

    /// Sends to a different endpoint (another user id, a proxy, a test server).
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    /// Returns the endpoint messages are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Encodes and sends a message.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` without contacting the server if the message
    /// is invalid, `Error::Api` if the server rejects it, and `Error::Http`
    /// on transport failure.
    pub async fn send(&self, message: &Message) -> Result<SentMessage> {
        let raw = RawMessage::encode(message)?;
        self.send_raw(&raw).await
    }

    /// Sends an already encoded message.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` if the server rejects it and `Error::Http` on
    /// transport failure.
    pub async fn send_raw(&self, raw: &RawMessage) -> Result<SentMessage> {
        debug!("Posting {} encoded bytes to {}", raw.raw.len(), self.endpoint);

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(&self.access_token)
            .json(raw)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ErrorResponse::from_body(status.as_u16(), &body));
        }

        let sent: SentMessage = response.json().await?;
        info!("Message sent with id {}", sent.id);
        Ok(sent)
    }
}

impl fmt::Debug for MailApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let client = MailApiClient::new("token").unwrap();
        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_custom_endpoint() {
        let client = MailApiClient::new("token")
            .unwrap()
            .with_endpoint("http://127.0.0.1:8080/send")
            .unwrap();
        assert_eq!(client.endpoint().port(), Some(8080));

        let err = MailApiClient::new("token")
            .unwrap()
            .with_endpoint("not a url")
            .unwrap_err();
        assert!(matches!(err, crate::Error::Url(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = MailApiClient::new("ya29.secret").unwrap();
        assert!(!format!("{client:?}").contains("ya29.secret"));
    }
}
