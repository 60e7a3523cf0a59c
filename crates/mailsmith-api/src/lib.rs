//! # mailsmith-api
//!
//! Sends [`mailsmith_mime::Message`] values through an HTTP mail API that
//! accepts a whole RFC 5322 message as one base64url `raw` field (the Gmail
//! `users.messages.send` shape).
//!
//! `Bcc` recipients are never written into the encoded bytes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailsmith_api::MailApiClient;
//! use mailsmith_mime::Message;
//!
//! # async fn run() -> mailsmith_api::Result<()> {
//! let client = MailApiClient::new("ya29.access-token")?;
//! let message = Message::new()
//!     .to("friend@example.com")
//!     .subject("Hello")
//!     .text_body("Hello, World!");
//!
//! let sent = client.send(&message).await?;
//! println!("sent as {}", sent.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod raw;

pub use client::{DEFAULT_ENDPOINT, MailApiClient};
pub use error::{Error, ErrorDetail, ErrorResponse, Result};
pub use raw::{RawMessage, SentMessage};
