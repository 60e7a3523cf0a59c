//! Error types for message encoding.

use crate::address::AddressError;
use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Header field an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    /// `From` header.
    From,
    /// `To` header.
    To,
    /// `Cc` header.
    Cc,
    /// `Bcc` (envelope only, never rendered).
    Bcc,
}

impl AddressField {
    /// Returns the header name as written on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::From => "From",
            Self::To => "To",
            Self::Cc => "Cc",
            Self::Bcc => "Bcc",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message encoding error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message has no `To` recipient.
    #[error("Message has no 'To' recipient")]
    MissingRecipient,

    /// The message has an empty subject.
    #[error("Message has no subject")]
    MissingSubject,

    /// An address in one of the address fields could not be parsed.
    #[error("Invalid address in {field} field: {source}")]
    AddressSyntax {
        /// Field holding the offending address.
        field: AddressField,
        /// Parser error, carrying the offending input.
        #[source]
        source: AddressError,
    },

    /// The secure random source failed while generating a multipart boundary.
    #[error("Random source failure: {0}")]
    RandomSource(#[from] rand::Error),

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid encoded input.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 decode error.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),
}

impl Error {
    /// Creates an address syntax error for the given field.
    #[must_use]
    pub const fn address(field: AddressField, source: AddressError) -> Self {
        Self::AddressSyntax { field, source }
    }
}
