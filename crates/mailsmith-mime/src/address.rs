//! RFC 5322 mailbox parsing and canonical rendering.
//!
//! Every address the encoder writes goes through [`parse_mailbox`] and is
//! re-rendered with [`Mailbox`]'s `Display` impl, so header bytes never carry
//! caller input verbatim.

use crate::encoding::{WordEncoding, decode_rfc2047, encode_words};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a single RFC 5322 mailbox.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} in {input:?}")]
pub struct AddressError {
    input: String,
    reason: &'static str,
}

impl AddressError {
    /// Returns the string that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns a short description of what was wrong.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A mailbox: optional display name plus `local@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// Display name, already decoded from any encoded-words.
    pub name: Option<String>,
    /// Bare address (`addr-spec`), with the local part re-quoted if needed.
    pub address: String,
}

impl Mailbox {
    /// Creates a mailbox without a display name.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mailbox(s)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            None => write!(f, "<{}>", self.address),
            Some(name) if is_printable_ascii(name) => {
                write!(f, "{} <{}>", quote(name), self.address)
            }
            Some(name) => write!(
                f,
                "{} <{}>",
                encode_words(name, WordEncoding::B),
                self.address
            ),
        }
    }
}

/// Parses a single mailbox: `addr-spec` or `[display-name] <addr-spec>`.
///
/// # Errors
///
/// Returns an error if the input is empty, malformed, or holds more than one
/// address.
pub fn parse_mailbox(input: &str) -> Result<Mailbox, AddressError> {
    Parser::new(input)
        .mailbox()
        .map_err(|reason| AddressError {
            input: input.to_string(),
            reason,
        })
}

type ParseResult<T> = Result<T, &'static str>;

/// A display-name word and whether it was an atom (as opposed to quoted).
struct Word {
    text: String,
    is_atom: bool,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn mailbox(&mut self) -> ParseResult<Mailbox> {
        self.skip_cfws()?;
        if self.at_end() {
            return Err("empty address");
        }

        // Bare addr-spec first, then fall back to name-addr.
        let start = self.pos;
        let spec_error = match self.addr_spec() {
            Ok(address) => {
                self.skip_cfws()?;
                if self.at_end() {
                    return Ok(Mailbox::new(address));
                }
                "unexpected characters after address"
            }
            Err(reason) => reason,
        };
        self.pos = start;

        let name = if self.peek() == Some('<') {
            None
        } else {
            Some(self.display_name()?)
        };

        self.skip_cfws()?;
        if !self.eat('<') {
            return Err(spec_error);
        }
        let address = self.addr_spec()?;
        if !self.eat('>') {
            return Err("missing '>' after address");
        }
        self.skip_cfws()?;
        if !self.at_end() {
            return Err("unexpected characters after address");
        }

        Ok(Mailbox {
            name: name.filter(|name| !name.is_empty()),
            address,
        })
    }

    fn addr_spec(&mut self) -> ParseResult<String> {
        self.skip_cfws()?;
        let local = if self.peek() == Some('"') {
            let local = self.quoted_string()?;
            if is_dot_atom(&local) {
                local
            } else {
                quote(&local)
            }
        } else {
            self.dot_atom().map_err(|_| "invalid local part")?
        };

        self.skip_cfws()?;
        if !self.eat('@') {
            return Err("missing @ in address");
        }
        self.skip_cfws()?;
        if self.at_end() {
            return Err("missing domain in address");
        }

        let domain = if self.peek() == Some('[') {
            self.domain_literal()?
        } else {
            self.dot_atom().map_err(|_| "invalid domain")?
        };
        self.skip_cfws()?;

        Ok(format!("{local}@{domain}"))
    }

    fn atom(&mut self, allow_dot: bool) -> ParseResult<&'a str> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if is_atext(ch) || (allow_dot && ch == '.') {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err("expected atom");
        }
        Ok(&self.input[start..self.pos])
    }

    fn dot_atom(&mut self) -> ParseResult<String> {
        let text = self.atom(true)?;
        if is_dot_atom(text) {
            Ok(text.to_string())
        } else {
            Err("misplaced '.'")
        }
    }

    fn domain_literal(&mut self) -> ParseResult<String> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some(']') => return Ok(self.input[start..self.pos].to_string()),
                Some(ch) if ch.is_ascii_graphic() && ch != '[' && ch != '\\' => {}
                Some(_) => return Err("invalid domain literal"),
                None => return Err("unterminated domain literal"),
            }
        }
    }

    fn quoted_string(&mut self) -> ParseResult<String> {
        let mut text = String::new();
        self.bump();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some(ch) if !matches!(ch, '\r' | '\n') => text.push(ch),
                    _ => return Err("invalid quoted-pair"),
                },
                Some('\r' | '\n') => return Err("line break in quoted string"),
                Some(ch) => text.push(ch),
                None => return Err("unterminated quoted string"),
            }
        }
    }

    fn display_name(&mut self) -> ParseResult<String> {
        let mut words = Vec::new();
        loop {
            self.skip_cfws()?;
            match self.peek() {
                Some('"') => words.push(Word {
                    text: self.quoted_string()?,
                    is_atom: false,
                }),
                // obs-phrase allows '.' in names such as "John Q. Public"
                Some(ch) if is_atext(ch) || ch == '.' => words.push(Word {
                    text: self.atom(true)?.to_string(),
                    is_atom: true,
                }),
                _ => break,
            }
        }
        if words.is_empty() {
            return Err("missing display name");
        }

        let mut name = String::new();
        let mut previous_encoded = false;
        for word in words {
            let encoded = word.is_atom && word.text.starts_with("=?") && word.text.ends_with("?=");
            if !name.is_empty() && !(encoded && previous_encoded) {
                name.push(' ');
            }
            if encoded {
                let decoded =
                    decode_rfc2047(&word.text).map_err(|_| "invalid encoded-word in display name")?;
                name.push_str(&decoded);
            } else {
                name.push_str(&word.text);
            }
            previous_encoded = encoded;
        }
        Ok(name)
    }

    /// Skips folding whitespace and (nested) comments.
    fn skip_cfws(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                Some(' ' | '\t') => {
                    self.bump();
                }
                Some('(') => self.comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn comment(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.bump() {
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err("unterminated comment");
                    }
                }
                Some('\r' | '\n') => return Err("line break in comment"),
                Some(_) => {}
                None => return Err("unterminated comment"),
            }
        }
    }
}

/// `atext` from RFC 5322 section 3.2.3, extended to UTF-8 by RFC 6532.
fn is_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(ch) || !ch.is_ascii()
}

fn is_dot_atom(text: &str) -> bool {
    !text.is_empty()
        && text
            .split('.')
            .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_printable_ascii(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t' || b.is_ascii_graphic())
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bare_address() {
        let mailbox = parse_mailbox("user@example.com").unwrap();
        assert_eq!(mailbox.name, None);
        assert_eq!(mailbox.address, "user@example.com");
        assert_eq!(mailbox.to_string(), "<user@example.com>");
    }

    #[test]
    fn test_name_addr() {
        let mailbox = parse_mailbox("A User <a@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("A User"));
        assert_eq!(mailbox.address, "a@example.com");
        assert_eq!(mailbox.to_string(), "\"A User\" <a@example.com>");
    }

    #[test]
    fn test_quoted_name_is_normalized() {
        let quoted: Mailbox = "\"Name\" <user@example.com>".parse().unwrap();
        assert_eq!(quoted.to_string(), "\"Name\" <user@example.com>");

        let odd = parse_mailbox("  \"Doe, \\\"J\\\"\"   <j@example.com> ").unwrap();
        assert_eq!(odd.name.as_deref(), Some("Doe, \"J\""));
        assert_eq!(odd.to_string(), "\"Doe, \\\"J\\\"\" <j@example.com>");
    }

    #[test]
    fn test_angle_addr_without_name() {
        let mailbox = parse_mailbox("<user@example.com>").unwrap();
        assert_eq!(mailbox.name, None);
        assert_eq!(mailbox.to_string(), "<user@example.com>");
    }

    #[test]
    fn test_dotted_display_name() {
        let mailbox = parse_mailbox("John Q. Public <jqp@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("John Q. Public"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let mailbox = parse_mailbox("(work (main)) pete@example.com (Pete)").unwrap();
        assert_eq!(mailbox.address, "pete@example.com");
        assert_eq!(mailbox.name, None);
    }

    #[test]
    fn test_non_ascii_name_is_encoded() {
        let mailbox = parse_mailbox("Jöran Öberg <joran@example.se>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Jöran Öberg"));
        let rendered = mailbox.to_string();
        assert!(rendered.starts_with("=?UTF-8?B?"));
        assert!(rendered.ends_with(" <joran@example.se>"));

        let reparsed = parse_mailbox(&rendered).unwrap();
        assert_eq!(reparsed, mailbox);
    }

    #[test]
    fn test_encoded_word_names_are_decoded() {
        let mailbox = parse_mailbox("=?utf-8?q?Andr=C3=A9?= Pirard <pirard@example.be>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("André Pirard"));
    }

    #[test]
    fn test_quoted_local_part() {
        let mailbox = parse_mailbox("\"john doe\"@example.com").unwrap();
        assert_eq!(mailbox.address, "\"john doe\"@example.com");

        // Needlessly quoted local parts are unquoted
        let mailbox = parse_mailbox("\"john\"@example.com").unwrap();
        assert_eq!(mailbox.address, "john@example.com");
    }

    #[test]
    fn test_domain_literal() {
        let mailbox = parse_mailbox("postmaster@[192.0.2.1]").unwrap();
        assert_eq!(mailbox.address, "postmaster@[192.0.2.1]");
    }

    #[test]
    fn test_rejects_garbage() {
        for input in [
            "",
            "   ",
            "not-an-address",
            "@example.com",
            "user@",
            "user@@example.com",
            "user.@example.com",
            "a@b.c, d@e.f",
            "Name <user@example.com",
            "Name user@example.com>",
            "\"unterminated@example.com",
            "user@example.com\r\nBcc: x@example.com",
            "(open comment user@example.com",
        ] {
            assert!(parse_mailbox(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_error_carries_input() {
        let err = parse_mailbox("not-an-address").unwrap_err();
        assert_eq!(err.input(), "not-an-address");
        assert_eq!(err.reason(), "missing @ in address");
    }

    #[test]
    fn test_control_characters_in_constructed_name_are_encoded() {
        let mailbox = Mailbox::new("a@example.com").with_name("Evil\r\nBcc: x@example.com");
        let rendered = mailbox.to_string();
        assert!(!rendered.contains('\r'));
        assert!(!rendered.contains('\n'));
    }

    proptest! {
        #[test]
        fn prop_rendered_mailbox_reparses(
            name in "[a-zA-Z0-9 .,;:\"\\\\éü]{0,30}",
            local in "[a-z0-9]{1,10}(\\.[a-z0-9]{1,10}){0,2}",
            domain in "[a-z]{1,10}\\.[a-z]{2,5}",
        ) {
            let mailbox = Mailbox::new(format!("{local}@{domain}")).with_name(name.clone());
            let reparsed = parse_mailbox(&mailbox.to_string()).unwrap();
            prop_assert_eq!(&reparsed.address, &mailbox.address);
            let expected = if name.is_empty() { None } else { Some(name) };
            prop_assert_eq!(reparsed.name, expected);
        }
    }
}
