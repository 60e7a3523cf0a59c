//! SMTP extension types.

/// Service extension advertised in an EHLO reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Extension {
    /// STARTTLS - TLS upgrade
    StartTls,
    /// AUTH - Authentication with the listed mechanisms
    Auth(Vec<AuthMechanism>),
    /// SIZE - Maximum message size, if declared
    Size(Option<usize>),
    /// 8BITMIME - 8-bit message bodies
    EightBitMime,
    /// SMTPUTF8 - UTF-8 addresses and headers
    SmtpUtf8,
    /// PIPELINING - Command pipelining
    Pipelining,
    /// Anything else, kept verbatim
    Other(String),
}

impl Extension {
    /// Parses one EHLO capability line (without the reply code).
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Self::Other(String::new());
        };

        if keyword.eq_ignore_ascii_case("STARTTLS") {
            Self::StartTls
        } else if keyword.eq_ignore_ascii_case("AUTH") {
            Self::Auth(words.filter_map(AuthMechanism::parse).collect())
        } else if let Some(first) = strip_prefix_ignore_case(keyword, "AUTH=") {
            // Pre-RFC 4954 form: `AUTH=PLAIN LOGIN`
            Self::Auth(
                std::iter::once(first)
                    .chain(words)
                    .filter_map(AuthMechanism::parse)
                    .collect(),
            )
        } else if keyword.eq_ignore_ascii_case("SIZE") {
            Self::Size(words.next().and_then(|size| size.parse().ok()))
        } else if keyword.eq_ignore_ascii_case("8BITMIME") {
            Self::EightBitMime
        } else if keyword.eq_ignore_ascii_case("SMTPUTF8") {
            Self::SmtpUtf8
        } else if keyword.eq_ignore_ascii_case("PIPELINING") {
            Self::Pipelining
        } else {
            Self::Other(line.to_string())
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &text[prefix.len()..])
}

/// SASL authentication mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    /// PLAIN - RFC 4616
    Plain,
    /// LOGIN - legacy plaintext
    Login,
    /// `XOAUTH2` - Google/Microsoft `OAuth2`
    XOAuth2,
}

impl AuthMechanism {
    /// Parses a mechanism name; unknown mechanisms yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        [Self::Plain, Self::Login, Self::XOAuth2]
            .into_iter()
            .find(|mechanism| mechanism.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns the mechanism name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
            Self::XOAuth2 => "XOAUTH2",
        }
    }
}
