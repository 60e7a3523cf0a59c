//! Type-state SMTP client.

use super::{ServerInfo, SmtpStream};
use crate::command::{Command, MailParams};
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Reply, ReplyCode};
use base64::Engine;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Type-state marker for connected state.
#[derive(Debug)]
pub struct Connected;

/// Type-state marker for authenticated state.
#[derive(Debug)]
pub struct Authenticated;

/// Type-state marker for mail transaction started.
#[derive(Debug)]
pub struct MailTransaction;

/// Type-state marker for recipient added.
#[derive(Debug)]
pub struct RecipientAdded;

/// Type-state marker for data mode.
#[derive(Debug)]
pub struct Data;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Connected {}
    impl Sealed for super::Authenticated {}
}

/// States from which a mail transaction may start.
pub trait MailReady: sealed::Sealed {}

impl MailReady for Connected {}
impl MailReady for Authenticated {}

/// Maximum number of lines accepted in one reply.
const MAX_REPLY_LINES: usize = 256;

/// SMTP client with type-state pattern.
#[derive(Debug)]
pub struct Client<State> {
    stream: SmtpStream,
    server_info: ServerInfo,
    _state: PhantomData<State>,
}

/// Connection trait for all states.
pub trait SmtpConnection {
    /// Returns the server information.
    fn server_info(&self) -> &ServerInfo;

    /// Returns true once the connection runs over TLS.
    fn is_encrypted(&self) -> bool;
}

impl<S> SmtpConnection for Client<S> {
    fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    fn is_encrypted(&self) -> bool {
        self.stream.is_tls()
    }
}

impl Client<Connected> {
    /// Creates a client from a stream and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or if the server returns an error.
    pub async fn from_stream(mut stream: SmtpStream) -> Result<Self> {
        let greeting = read_reply(&mut stream)
            .await?
            .expect_code(ReplyCode::SERVICE_READY)?;

        // Hostname is the first word of the greeting text
        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        debug!("Connected to SMTP server {hostname}");

        Ok(Self {
            stream,
            server_info: ServerInfo {
                hostname,
                ..ServerInfo::default()
            },
            _state: PhantomData,
        })
    }

    /// Sends EHLO and discovers server capabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if the EHLO command fails.
    pub async fn ehlo(mut self, client_hostname: &str) -> Result<Self> {
        self.hello(client_hostname).await?;
        Ok(self)
    }

    /// Upgrades the connection to TLS using STARTTLS, then repeats EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if STARTTLS is not supported or if the upgrade fails.
    pub async fn starttls(mut self, hostname: &str, client_hostname: &str) -> Result<Self> {
        if !self.server_info.supports_starttls() {
            return Err(Error::NotSupported("STARTTLS".into()));
        }

        self.send_command(Command::StartTls)
            .await?
            .expect_success()?;
        self.stream = self.stream.upgrade_to_tls(hostname).await?;
        debug!("Upgraded connection to TLS");

        // Capabilities learned before the upgrade must be discarded
        self.hello(client_hostname).await?;
        Ok(self)
    }

    /// Authenticates using the PLAIN mechanism.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotSupported` if the server does not offer PLAIN, or
    /// an SMTP error if the credentials are rejected.
    pub async fn auth_plain(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<Authenticated>> {
        if !self.server_info.supports_auth(AuthMechanism::Plain) {
            return Err(Error::NotSupported("AUTH PLAIN".into()));
        }

        // RFC 4616: authzid NUL authcid NUL passwd
        let credentials = format!("\0{username}\0{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        self.send_command(Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(encoded),
        })
        .await?
        .expect_code(ReplyCode::AUTH_SUCCESS)?;
        debug!("Authenticated as {username}");

        Ok(self.into_state())
    }

    async fn hello(&mut self, client_hostname: &str) -> Result<()> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?
            .expect_success()?;

        // First line is the server's greeting, the rest are capabilities
        self.server_info.set_capabilities(reply.message.iter().skip(1));
        Ok(())
    }
}

impl<S: MailReady> Client<S> {
    /// Starts a mail transaction. `None` sends the null reverse path `<>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the MAIL FROM command fails.
    pub async fn mail_from(
        mut self,
        from: Option<Address>,
        params: MailParams,
    ) -> Result<Client<MailTransaction>> {
        self.send_command(Command::MailFrom { from, params })
            .await?
            .expect_success()?;
        Ok(self.into_state())
    }
}

impl Client<MailTransaction> {
    /// Adds the first recipient to the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(mut self, to: Address) -> Result<Client<RecipientAdded>> {
        self.add_recipient(to).await?;
        Ok(self.into_state())
    }

    /// Aborts the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RSET command fails.
    pub async fn reset(mut self) -> Result<Client<Connected>> {
        self.rset().await?;
        Ok(self.into_state())
    }
}

impl Client<RecipientAdded> {
    /// Adds another recipient to the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(mut self, to: Address) -> Result<Self> {
        self.add_recipient(to).await?;
        Ok(self)
    }

    /// Begins sending message data.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not answer DATA with 354.
    pub async fn data(mut self) -> Result<Client<Data>> {
        self.send_command(Command::Data)
            .await?
            .expect_code(ReplyCode::START_DATA)?;
        Ok(self.into_state())
    }

    /// Aborts the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RSET command fails.
    pub async fn reset(mut self) -> Result<Client<Connected>> {
        self.rset().await?;
        Ok(self.into_state())
    }
}

impl Client<Data> {
    /// Sends the message content and completes the transaction.
    ///
    /// Line endings are normalized to CRLF, lines starting with `.` are
    /// dot-stuffed, and the terminating `.` line is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if sending the message fails or server rejects it.
    pub async fn send_message(mut self, message: &[u8]) -> Result<Client<Connected>> {
        let data = dot_stuff(message);
        trace!("Sending {} bytes of message data", data.len());
        self.stream.write_all(&data).await?;

        let reply = read_reply(&mut self.stream).await?.expect_success()?;
        debug!("Message accepted: {}", reply.message_text());

        Ok(self.into_state())
    }
}

// Common implementation for all states
impl<S> Client<S> {
    fn into_state<T>(self) -> Client<T> {
        Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        }
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        trace!("> {}", cmd.log_line());
        self.stream.write_all(&cmd.serialize()).await?;
        read_reply(&mut self.stream).await
    }

    async fn add_recipient(&mut self, to: Address) -> Result<()> {
        self.send_command(Command::RcptTo { to })
            .await?
            .expect_success()?;
        Ok(())
    }

    async fn rset(&mut self) -> Result<()> {
        self.send_command(Command::Rset).await?.expect_success()?;
        Ok(())
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;
        if reply.code != ReplyCode::CLOSING {
            reply.expect_success()?;
        }
        Ok(())
    }
}

async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = stream.read_line().await?;
        trace!("< {line}");
        let is_last = is_last_reply_line(&line);
        lines.push(line);

        if is_last {
            break;
        }
        if lines.len() >= MAX_REPLY_LINES {
            return Err(Error::Protocol("Reply has too many lines".into()));
        }
    }

    parse_reply(&lines)
}

/// Normalizes line endings to CRLF, dot-stuffs, and appends `.` CRLF.
fn dot_stuff(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + message.len() / 64 + 5);
    let body = message
        .strip_suffix(b"\n")
        .map_or(message, |body| body.strip_suffix(b"\r").unwrap_or(body));

    if !body.is_empty() {
        for line in body.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.first() == Some(&b'.') {
                out.push(b'.');
            }
            out.extend_from_slice(line);
            out.extend_from_slice(b"\r\n");
        }
    }

    out.extend_from_slice(b".\r\n");
    out
}
