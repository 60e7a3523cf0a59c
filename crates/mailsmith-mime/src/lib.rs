//! # mailsmith-mime
//!
//! Encoder for outgoing email: turns a small [`Message`] model into a
//! byte-exact RFC 5322 message with a MIME body, ready for SMTP `DATA` or
//! for an HTTP mail API's raw-message field.
//!
//! ## Features
//!
//! - **Address headers**: every `From`/`To`/`Cc` entry is parsed as an
//!   RFC 5322 mailbox and re-rendered canonically
//! - **Subjects**: non-ASCII text becomes RFC 2047 encoded-words
//! - **Bodies**: `text/plain`, `text/html`, or `multipart/mixed` with a
//!   random boundary
//! - **Envelope**: [`Message::recipient_addresses`] resolves `To`, `Cc` and
//!   `Bcc` for the transport; `Bcc` never reaches the header block
//!
//! ## Quick Start
//!
//! ```
//! use mailsmith_mime::Message;
//!
//! let message = Message::new()
//!     .from("Sender <sender@example.com>")
//!     .to("recipient@example.com")
//!     .subject("Héllo")
//!     .text_body("Hello, World!");
//!
//! let bytes = message.to_bytes()?;
//! assert!(bytes.starts_with(b"From: \"Sender\" <sender@example.com>\r\n"));
//! # Ok::<(), mailsmith_mime::Error>(())
//! ```
//!
//! ### Deterministic boundaries
//!
//! ```
//! use mailsmith_mime::Message;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let message = Message::new()
//!     .to("recipient@example.com")
//!     .subject("Both bodies")
//!     .text_body("plain")
//!     .html_body("<p>html</p>");
//!
//! let mut out = Vec::new();
//! message.encode_with_rng(&mut out, &mut StdRng::seed_from_u64(42))?;
//! # Ok::<(), mailsmith_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod boundary;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;
pub mod html;

pub use address::{AddressError, Mailbox, parse_mailbox};
pub use boundary::{BOUNDARY_BYTES, BOUNDARY_LEN, generate_boundary};
pub use content_type::{ContentType, TransferEncoding};
pub use error::{AddressField, Error, Result};
pub use header::{encode_subject, parse_addresses, write_address_header, write_mailboxes};
pub use message::{BodyKind, Message};
