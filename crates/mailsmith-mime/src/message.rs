//! Outgoing message model and encoder.

use crate::address::Mailbox;
use crate::boundary::generate_boundary;
use crate::content_type::{ContentType, TransferEncoding};
use crate::encoding::encode_base64url;
use crate::error::{AddressField, Error, Result};
use crate::header::{encode_subject, parse_addresses, write_mailboxes};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Body layout chosen from which bodies are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Single `text/plain` part (also used when both bodies are empty).
    PlainText,
    /// Single `text/html` part.
    Html,
    /// `multipart/mixed` with a plaintext part and a base64url HTML part.
    Multipart,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlainText => "text/plain",
            Self::Html => "text/html",
            Self::Multipart => "multipart/mixed",
        })
    }
}

/// An email to be encoded.
///
/// Addresses are kept as the caller wrote them and are only parsed when the
/// message is encoded or its recipients are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender; `None` or an empty string omits the `From` header.
    pub from: Option<String>,
    /// Primary recipients; must not be empty.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients. Never written into the header block.
    pub bcc: Vec<String>,
    /// Subject; must not be empty.
    pub subject: String,
    /// Plaintext body.
    pub text_body: String,
    /// HTML body bytes.
    pub html_body: Vec<u8>,
}

/// Every address of a message, parsed.
struct Parsed {
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Adds a `To` recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a `Cc` recipient.
    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a `Bcc` recipient.
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the plaintext body.
    #[must_use]
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = body.into();
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.html_body = body.into();
        self
    }

    /// Returns the body layout [`encode`](Self::encode) will produce.
    #[must_use]
    pub fn body_kind(&self) -> BodyKind {
        match (self.text_body.is_empty(), self.html_body.is_empty()) {
            (false, false) => BodyKind::Multipart,
            (true, false) => BodyKind::Html,
            (_, true) => BodyKind::PlainText,
        }
    }

    /// Encodes the message using the operating system's random source for
    /// multipart boundaries.
    ///
    /// # Errors
    ///
    /// See [`encode_with_rng`](Self::encode_with_rng).
    pub fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.encode_with_rng(w, &mut OsRng)
    }

    /// Encodes the message into `w`, drawing the multipart boundary from
    /// `rng`.
    ///
    /// Checks run in this order: missing `To`, missing subject, then the
    /// `From`, `To`, `Cc` and `Bcc` addresses, then boundary generation.
    /// Nothing is written until all of them pass. `Bcc` is validated but
    /// never written.
    ///
    /// # Errors
    ///
    /// Returns `MissingRecipient`, `MissingSubject`, `AddressSyntax`,
    /// `RandomSource`, or `Io` if the writer fails midway.
    pub fn encode_with_rng<W, R>(&self, w: &mut W, rng: &mut R) -> Result<()>
    where
        W: Write + ?Sized,
        R: RngCore + CryptoRng + ?Sized,
    {
        if self.to.is_empty() {
            return Err(Error::MissingRecipient);
        }
        if self.subject.is_empty() {
            return Err(Error::MissingSubject);
        }

        let parsed = self.parse()?;
        let kind = self.body_kind();
        let boundary = match kind {
            BodyKind::Multipart => Some(generate_boundary(rng)?),
            BodyKind::PlainText | BodyKind::Html => None,
        };
        debug!(
            "Encoding {kind} message for {} to, {} cc, {} bcc recipients",
            parsed.to.len(),
            parsed.cc.len(),
            parsed.bcc.len()
        );

        if let Some(from) = &parsed.from {
            write_mailboxes(w, AddressField::From, std::slice::from_ref(from))?;
        }
        write_mailboxes(w, AddressField::To, &parsed.to)?;
        write_mailboxes(w, AddressField::Cc, &parsed.cc)?;
        write!(w, "Subject: {}\r\n", encode_subject(&self.subject))?;

        w.write_all(b"MIME-Version: 1.0\r\n")?;
        match boundary {
            Some(boundary) => self.write_multipart(w, &boundary)?,
            None if kind == BodyKind::Html => {
                write!(w, "Content-Type: {}\r\n\r\n", ContentType::text_html())?;
                w.write_all(&self.html_body)?;
            }
            None => {
                write!(w, "Content-Type: {}\r\n\r\n", ContentType::text_plain())?;
                w.write_all(self.text_body.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_multipart<W: Write + ?Sized>(&self, w: &mut W, boundary: &str) -> Result<()> {
        write!(
            w,
            "Content-Type: {}\r\n",
            ContentType::multipart_mixed(boundary)
        )?;

        write!(
            w,
            "\r\n--{boundary}\r\nContent-Type: {}\r\n\r\n",
            ContentType::text_plain()
        )?;
        w.write_all(self.text_body.as_bytes())?;

        write!(
            w,
            "\r\n--{boundary}\r\nContent-Type: {}\r\nContent-Transfer-Encoding: {}\r\n\r\n",
            ContentType::text_html(),
            TransferEncoding::Base64
        )?;
        w.write_all(encode_base64url(&self.html_body).as_bytes())?;

        write!(w, "\r\n--{boundary}--")?;
        Ok(())
    }

    /// Encodes the message into a new buffer.
    ///
    /// # Errors
    ///
    /// See [`encode_with_rng`](Self::encode_with_rng).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Returns the bare addresses of all `To`, `Cc` and `Bcc` recipients, in
    /// that order.
    ///
    /// # Errors
    ///
    /// Returns `AddressSyntax` if any recipient does not parse.
    pub fn recipient_addresses(&self) -> Result<Vec<String>> {
        let mut addresses = Vec::with_capacity(self.to.len() + self.cc.len() + self.bcc.len());
        for (field, raw) in [
            (AddressField::To, &self.to),
            (AddressField::Cc, &self.cc),
            (AddressField::Bcc, &self.bcc),
        ] {
            addresses.extend(
                parse_addresses(field, raw)?
                    .into_iter()
                    .map(|mailbox| mailbox.address),
            );
        }
        Ok(addresses)
    }

    /// Returns the bare sender address, or `None` when there is no sender.
    ///
    /// # Errors
    ///
    /// Returns `AddressSyntax` if the sender does not parse.
    pub fn sender_address(&self) -> Result<Option<String>> {
        Ok(self.parse_from()?.map(|mailbox| mailbox.address))
    }

    fn parse_from(&self) -> Result<Option<Mailbox>> {
        match self.from.as_deref().filter(|from| !from.is_empty()) {
            Some(from) => Ok(parse_addresses(AddressField::From, &[from])?.pop()),
            None => Ok(None),
        }
    }

    fn parse(&self) -> Result<Parsed> {
        Ok(Parsed {
            from: self.parse_from()?,
            to: parse_addresses(AddressField::To, &self.to)?,
            cc: parse_addresses(AddressField::Cc, &self.cc)?,
            bcc: parse_addresses(AddressField::Bcc, &self.bcc)?,
        })
    }
}
