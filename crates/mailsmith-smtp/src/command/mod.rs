//! SMTP command builder.

use crate::types::{Address, AuthMechanism};

/// Optional `MAIL FROM` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailParams {
    /// Declare `BODY=8BITMIME` (RFC 6152).
    pub eight_bit_mime: bool,
    /// Declare `SIZE=` (RFC 1870).
    pub size: Option<usize>,
}

/// SMTP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - Extended greeting
    Ehlo {
        /// Client hostname
        hostname: String,
    },
    /// STARTTLS - Upgrade to TLS
    StartTls,
    /// AUTH - Begin authentication
    Auth {
        /// Authentication mechanism
        mechanism: AuthMechanism,
        /// Initial response (SASL-IR)
        initial_response: Option<String>,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Reverse path; `None` sends the null path `<>`
        from: Option<Address>,
        /// Extension parameters
        params: MailParams,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Recipient address
        to: Address,
    },
    /// DATA - Begin message data
    Data,
    /// RSET - Reset transaction
    Rset,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Serializes the command to bytes, including the trailing CRLF.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = self.render(false).into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns the command line for logs, with credentials masked.
    #[must_use]
    pub fn log_line(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        match self {
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::Auth {
                mechanism,
                initial_response,
            } => match initial_response {
                Some(_) if redact => format!("AUTH {} ****", mechanism.as_str()),
                Some(response) => format!("AUTH {} {response}", mechanism.as_str()),
                None => format!("AUTH {}", mechanism.as_str()),
            },
            Self::MailFrom { from, params } => {
                let mut line = format!(
                    "MAIL FROM:<{}>",
                    from.as_ref().map_or("", Address::as_str)
                );
                if params.eight_bit_mime {
                    line.push_str(" BODY=8BITMIME");
                }
                if let Some(size) = params.size {
                    line.push_str(&format!(" SIZE={size}"));
                }
                line
            }
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Rset => "RSET".to_string(),
            Self::Quit => "QUIT".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ehlo_command() {
        let cmd = Command::Ehlo {
            hostname: "client.example.com".to_string(),
        };
        assert_eq!(cmd.serialize(), b"EHLO client.example.com\r\n");
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::StartTls.serialize(), b"STARTTLS\r\n");
        assert_eq!(Command::Data.serialize(), b"DATA\r\n");
        assert_eq!(Command::Rset.serialize(), b"RSET\r\n");
        assert_eq!(Command::Quit.serialize(), b"QUIT\r\n");
    }

    #[test]
    fn test_auth_plain_is_masked_in_logs() {
        let cmd = Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some("AHVzZXIAcGFzcw==".to_string()),
        };
        assert_eq!(cmd.serialize(), b"AUTH PLAIN AHVzZXIAcGFzcw==\r\n");
        assert_eq!(cmd.log_line(), "AUTH PLAIN ****");
    }

    #[test]
    fn test_mail_from_simple() {
        let cmd = Command::MailFrom {
            from: Some(Address::new("sender@example.com").unwrap()),
            params: MailParams::default(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM:<sender@example.com>\r\n");
    }

    #[test]
    fn test_mail_from_null_path() {
        let cmd = Command::MailFrom {
            from: None,
            params: MailParams::default(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM:<>\r\n");
    }

    #[test]
    fn test_mail_from_with_params() {
        let cmd = Command::MailFrom {
            from: Some(Address::new("sender@example.com").unwrap()),
            params: MailParams {
                eight_bit_mime: true,
                size: Some(12345),
            },
        };
        assert_eq!(
            cmd.serialize(),
            b"MAIL FROM:<sender@example.com> BODY=8BITMIME SIZE=12345\r\n"
        );
    }

    #[test]
    fn test_rcpt_to_command() {
        let cmd = Command::RcptTo {
            to: Address::new("Recipient <recipient@example.com>").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"RCPT TO:<recipient@example.com>\r\n");
    }
}
