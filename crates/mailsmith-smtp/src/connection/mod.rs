//! SMTP connection management with type-state pattern.

mod client;
mod stream;

pub use client::{
    Authenticated, Client, Connected, Data, MailReady, MailTransaction, RecipientAdded,
    SmtpConnection,
};
pub use stream::{SmtpStream, connect, connect_tls};

use crate::types::{AuthMechanism, Extension};
use std::collections::HashSet;

/// Server capabilities from the greeting and EHLO reply.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname from greeting.
    pub hostname: String,
    /// Supported extensions.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks if the server supports an extension.
    #[must_use]
    pub fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }

    /// Checks if STARTTLS is supported.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports(&Extension::StartTls)
    }

    /// Checks if 8BITMIME is supported.
    #[must_use]
    pub fn supports_8bitmime(&self) -> bool {
        self.supports(&Extension::EightBitMime)
    }

    /// Checks if the SIZE extension is advertised, with or without a limit.
    #[must_use]
    pub fn supports_size(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| matches!(ext, Extension::Size(_)))
    }

    /// Returns the maximum message size, if advertised and non-zero.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        self.extensions
            .iter()
            .find_map(|ext| match ext {
                Extension::Size(size) => *size,
                _ => None,
            })
            .filter(|&size| size > 0)
    }

    /// Returns the advertised authentication mechanisms from every `AUTH`
    /// and `AUTH=` line, without duplicates.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        let mut all = Vec::new();
        for ext in &self.extensions {
            if let Extension::Auth(mechanisms) = ext {
                for &mechanism in mechanisms {
                    if !all.contains(&mechanism) {
                        all.push(mechanism);
                    }
                }
            }
        }
        all
    }

    /// Checks if an authentication mechanism is advertised.
    #[must_use]
    pub fn supports_auth(&self, mechanism: AuthMechanism) -> bool {
        self.extensions.iter().any(
            |ext| matches!(ext, Extension::Auth(mechanisms) if mechanisms.contains(&mechanism)),
        )
    }

    pub(crate) fn set_capabilities<'a>(&mut self, lines: impl IntoIterator<Item = &'a String>) {
        self.extensions = lines
            .into_iter()
            .map(|line| Extension::parse(line))
            .collect();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn server_info(lines: &[&str]) -> ServerInfo {
        let lines: Vec<String> = lines.iter().map(ToString::to_string).collect();
        let mut info = ServerInfo::default();
        info.set_capabilities(&lines);
        info
    }

    #[test]
    fn test_capabilities() {
        let info = server_info(&["STARTTLS", "AUTH PLAIN LOGIN", "SIZE 1000", "8BITMIME"]);
        assert!(info.supports_starttls());
        assert!(info.supports_8bitmime());
        assert!(info.supports_size());
        assert_eq!(info.max_message_size(), Some(1000));
        assert!(info.supports_auth(AuthMechanism::Plain));
        assert!(!info.supports_auth(AuthMechanism::XOAuth2));
    }

    #[test]
    fn test_legacy_auth_line() {
        let info = server_info(&["AUTH=PLAIN LOGIN"]);
        assert!(info.supports_auth(AuthMechanism::Plain));

        let info = server_info(&["AUTH XOAUTH2", "AUTH=PLAIN"]);
        assert!(info.supports_auth(AuthMechanism::Plain));
        assert!(info.supports_auth(AuthMechanism::XOAuth2));
        assert_eq!(info.auth_mechanisms().len(), 2);
    }

    #[test]
    fn test_size_without_limit() {
        let info = server_info(&["SIZE"]);
        assert!(info.supports_size());
        assert_eq!(info.max_message_size(), None);

        let info = server_info(&["SIZE 0"]);
        assert_eq!(info.max_message_size(), None);
    }

    #[test]
    fn test_no_capabilities() {
        let info = server_info(&[]);
        assert!(!info.supports_starttls());
        assert!(info.auth_mechanisms().is_empty());
    }
}
