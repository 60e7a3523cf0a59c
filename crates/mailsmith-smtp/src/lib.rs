//! # mailsmith-smtp
//!
//! SMTP submission for [`mailsmith_mime::Message`] values (RFC 5321).
//!
//! ## Features
//!
//! - **Type-state connection management**: Compile-time enforcement of valid
//!   SMTP state transitions
//! - **Protocol**: EHLO, STARTTLS, AUTH PLAIN, MAIL FROM (including the null
//!   path `<>`), RCPT TO, DATA with dot-stuffing, RSET, QUIT
//! - **TLS support**: Both implicit TLS (port 465) and STARTTLS, via rustls
//! - **Transport**: [`send_message`] runs a whole session from an
//!   [`SmtpConfig`], putting `Bcc` recipients on the envelope only
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailsmith_mime::Message;
//! use mailsmith_smtp::{Security, SmtpConfig, send_message};
//!
//! # async fn run() -> mailsmith_smtp::Result<()> {
//! let config = SmtpConfig::new("smtp.example.com", Security::StartTls)
//!     .with_credentials("user@example.com", "password");
//!
//! let message = Message::new()
//!     .from("user@example.com")
//!     .to("friend@example.com")
//!     .bcc("archive@example.com")
//!     .subject("Hello")
//!     .text_body("Hello, World!");
//!
//! send_message(&config, &message).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌──────────────┐
//! │  Connected   │ ─── auth_plain() ───→ Authenticated
//! └──────────────┘                            │
//!        │                                    │
//!        └──────────── mail_from() ←──────────┘
//!                          │
//!                          ↓
//!           MailTransaction ───→ RecipientAdded ───→ Data
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Response parser
//! - [`transport`]: Configuration and one-shot message submission
//! - [`types`]: Core SMTP types (addresses, extensions, replies)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod transport;
pub mod types;

pub use command::MailParams;
pub use connection::{
    Authenticated, Client, Connected, Data, MailReady, MailTransaction, RecipientAdded,
    ServerInfo, SmtpConnection,
};
pub use error::{Error, Result};
pub use transport::{Security, SmtpConfig, send_message};
pub use types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
