//! Message submission over SMTP.
//!
//! [`send_message`] resolves the envelope from a [`Message`], encodes it
//! without `Bcc` in the header block, and runs one complete SMTP session.

use crate::command::MailParams;
use crate::connection::{Client, MailReady, SmtpConnection, connect, connect_tls};
use crate::error::{Error, Result};
use crate::types::Address;
use mailsmith_mime::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// No encryption (not recommended).
    None,
    /// Implicit TLS (connect directly with TLS).
    #[default]
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

impl Security {
    /// Returns the conventional submission port for the mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Tls => 465,
        }
    }

    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::Tls => "SSL/TLS",
            Self::StartTls => "STARTTLS",
        }
    }
}

fn default_client_hostname() -> String {
    "localhost".to_string()
}

/// SMTP server configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Server hostname.
    pub host: String,
    /// Server port; 0 selects [`Security::default_port`].
    #[serde(default)]
    pub port: u16,
    /// Security mode.
    #[serde(default)]
    pub security: Security,
    /// Username for AUTH PLAIN; empty skips authentication.
    #[serde(default)]
    pub username: String,
    /// Password for AUTH PLAIN.
    #[serde(default)]
    pub password: String,
    /// Name sent with EHLO.
    #[serde(default = "default_client_hostname")]
    pub client_hostname: String,
}

impl SmtpConfig {
    /// Creates a configuration with default port and no credentials.
    #[must_use]
    pub fn new(host: impl Into<String>, security: Security) -> Self {
        Self {
            host: host.into(),
            port: 0,
            security,
            username: String::new(),
            password: String::new(),
            client_hostname: default_client_hostname(),
        }
    }

    /// Sets an explicit port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets AUTH PLAIN credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Returns the port to connect to.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        if self.port == 0 {
            self.security.default_port()
        } else {
            self.port
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_hostname", &self.client_hostname)
            .finish()
    }
}

/// Sends a message through the configured SMTP server.
///
/// The envelope recipients are the message's `To`, `Cc` and `Bcc` addresses;
/// the reverse path is the bare `From` address, or `<>` without one.
///
/// # Errors
///
/// Returns `Error::Encode` before any connection is made if the message is
/// invalid, and connection, protocol or server errors otherwise.
pub async fn send_message(config: &SmtpConfig, message: &Message) -> Result<()> {
    let recipients = message
        .recipient_addresses()?
        .iter()
        .map(Address::new)
        .collect::<Result<Vec<_>>>()?;
    let sender = message.sender_address()?.map(Address::new).transpose()?;
    let data = message.to_bytes()?;

    let port = config.effective_port();
    debug!(
        "Submitting {} bytes to {}:{} ({}) for {} recipients",
        data.len(),
        config.host,
        port,
        config.security.display_name(),
        recipients.len()
    );

    let stream = match config.security {
        Security::Tls => connect_tls(&config.host, port).await?,
        Security::StartTls | Security::None => connect(&config.host, port).await?,
    };

    let client = Client::from_stream(stream)
        .await?
        .ehlo(&config.client_hostname)
        .await?;

    let client = if config.security == Security::StartTls {
        client
            .starttls(&config.host, &config.client_hostname)
            .await?
    } else {
        client
    };

    let server = client.server_info();
    if let Some(limit) = server.max_message_size().filter(|&limit| data.len() > limit) {
        return Err(Error::MessageTooLarge {
            size: data.len(),
            limit,
        });
    }
    let params = MailParams {
        eight_bit_mime: !data.is_ascii() && server.supports_8bitmime(),
        size: server.supports_size().then_some(data.len()),
    };

    if config.username.is_empty() {
        deliver(client, sender, recipients, params, &data).await?;
    } else {
        if !client.is_encrypted() {
            warn!("Sending credentials to {} without encryption", config.host);
        }
        let client = client
            .auth_plain(&config.username, &config.password)
            .await?;
        deliver(client, sender, recipients, params, &data).await?;
    }

    info!("Message sent via {}", config.host);
    Ok(())
}

async fn deliver<S: MailReady>(
    client: Client<S>,
    sender: Option<Address>,
    recipients: Vec<Address>,
    params: MailParams,
    data: &[u8],
) -> Result<()> {
    let mut recipients = recipients.into_iter();
    let first = recipients
        .next()
        .ok_or_else(|| Error::InvalidAddress("No recipients specified".into()))?;

    let mut client = client.mail_from(sender, params).await?.rcpt_to(first).await?;
    for recipient in recipients {
        client = client.rcpt_to(recipient).await?;
    }

    client.data().await?.send_message(data).await?.quit().await
}
