//! MIME content type handling.

use crate::encoding::CHARSET;
use std::fmt;

/// MIME content type with parameters.
///
/// Parameters keep insertion order so rendered headers are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "mixed").
    pub sub_type: String,
    /// Parameters (e.g., charset=UTF-8, boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a `text/plain; charset=UTF-8` content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", CHARSET)
    }

    /// Creates a `text/html; charset=UTF-8` content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", CHARSET)
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Adds a parameter, replacing an existing one with the same name.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self
            .parameters
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
        {
            slot.1 = value;
        } else {
            self.parameters.push((key, value));
        }
        self
    }

    /// Returns a parameter value by case-insensitive name.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;
        for (key, value) in &self.parameters {
            if is_token(value) {
                write!(f, "; {key}={value}")?;
            } else {
                f.write_str("; ")?;
                f.write_str(key)?;
                f.write_str("=\"")?;
                for ch in value.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("\"")?;
            }
        }
        Ok(())
    }
}

/// RFC 2045 `token`: printable ASCII without spaces or tspecials.
fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?=".contains(&b))
}

/// Content transfer encoding of a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Base64 encoding.
    Base64,
}

impl TransferEncoding {
    /// Returns the header value for this encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Base64 => "base64",
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types() {
        assert_eq!(ContentType::text_plain().to_string(), "text/plain; charset=UTF-8");
        assert_eq!(ContentType::text_html().to_string(), "text/html; charset=UTF-8");
        assert_eq!(ContentType::text_html().charset(), Some("UTF-8"));
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("abc-DEF_123");
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("abc-DEF_123"));
        assert_eq!(ct.to_string(), "multipart/mixed; boundary=abc-DEF_123");
    }

    #[test]
    fn test_parameter_quoting() {
        let ct = ContentType::new("text", "plain").with_parameter("name", "a \"b\".txt");
        assert_eq!(ct.to_string(), "text/plain; name=\"a \\\"b\\\".txt\"");
    }

    #[test]
    fn test_parameter_replacement_keeps_order() {
        let ct = ContentType::text_plain()
            .with_parameter("format", "flowed")
            .with_parameter("CHARSET", "us-ascii");
        assert_eq!(ct.to_string(), "text/plain; charset=us-ascii; format=flowed");
    }

    #[test]
    fn test_transfer_encoding_display() {
        assert_eq!(TransferEncoding::Base64.to_string(), "base64");
        assert_eq!(TransferEncoding::default().as_str(), "7bit");
        assert_eq!(TransferEncoding::EightBit.as_str(), "8bit");
    }
}
