//! Envelope address type.

use crate::error::{Error, Result};
use mailsmith_mime::{Mailbox, parse_mailbox};

/// Bare `local@domain` path used by `MAIL FROM` and `RCPT TO`.
///
/// Any mailbox form is accepted; the display name is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Parses an address.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAddress` if the input is not a single mailbox.
    pub fn new(addr: impl AsRef<str>) -> Result<Self> {
        parse_mailbox(addr.as_ref())
            .map(Self::from)
            .map_err(|e| Error::InvalidAddress(e.to_string()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Mailbox> for Address {
    fn from(mailbox: Mailbox) -> Self {
        Self(mailbox.address)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
