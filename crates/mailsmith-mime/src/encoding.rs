//! Transfer and header encodings.
//!
//! Base64 (standard and URL-safe), quoted-printable decoding, and RFC 2047
//! encoded-words for non-ASCII header text.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use std::fmt::Write as _;

/// Charset label used for every encoded-word this crate produces.
pub const CHARSET: &str = "UTF-8";

/// Longest encoded-word allowed by RFC 2047 section 2.
const MAX_ENCODED_WORD_LEN: usize = 75;

/// Room left for encoded text once `=?UTF-8?X?` and `?=` are accounted for.
const MAX_ENCODED_TEXT_LEN: usize = MAX_ENCODED_WORD_LEN - CHARSET.len() - 7;

/// Encodes data as standard, padded Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes standard, padded Base64.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Encodes data as URL-safe Base64 without padding.
#[must_use]
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe Base64 without padding.
///
/// # Errors
///
/// Returns an error if the input is not valid unpadded URL-safe Base64.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(data).map_err(Into::into)
}

/// Decodes quoted-printable text (RFC 2045) into raw bytes.
///
/// # Errors
///
/// Returns an error if the input contains an invalid escape sequence.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break
        match bytes.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => {
                i += 3;
                continue;
            }
            Some([b'\n', ..]) => {
                i += 2;
                continue;
            }
            _ => {}
        }

        let hex = bytes
            .get(i + 1..i + 3)
            .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
        let hex = std::str::from_utf8(hex)
            .map_err(|_| Error::InvalidEncoding("Non-ASCII escape sequence".to_string()))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex {hex:?}: {e}")))?;
        result.push(byte);
        i += 3;
    }

    Ok(result)
}

/// Encoding scheme of an RFC 2047 encoded-word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordEncoding {
    /// `Q`: quoted-printable variant, `_` for space.
    Q,
    /// `B`: Base64.
    B,
}

impl WordEncoding {
    const fn letter(self) -> char {
        match self {
            Self::Q => 'Q',
            Self::B => 'B',
        }
    }

    /// Length of `bytes` once encoded with this scheme, without the wrapper.
    fn encoded_len(self, bytes: &[u8]) -> usize {
        match self {
            Self::Q => bytes.iter().map(|&b| if is_q_safe(b) { 1 } else { 3 }).sum(),
            Self::B => bytes.len().div_ceil(3) * 4,
        }
    }

    fn encode_text(self, bytes: &[u8], out: &mut String) {
        match self {
            Self::Q => {
                for &b in bytes {
                    if b == b' ' {
                        out.push('_');
                    } else if is_q_safe(b) {
                        out.push(char::from(b));
                    } else {
                        let _ = write!(out, "={b:02X}");
                    }
                }
            }
            Self::B => out.push_str(&encode_base64(bytes)),
        }
    }
}

/// Bytes that stand for themselves inside a `Q` encoded-word.
const fn is_q_safe(b: u8) -> bool {
    b == b' ' || (b.is_ascii_graphic() && b != b'=' && b != b'?' && b != b'_')
}

/// Reports whether `text` has to be turned into encoded-words before it can
/// be placed in an unstructured header field.
#[must_use]
pub fn needs_encoding(text: &str) -> bool {
    text.contains("=?")
        || text
            .bytes()
            .any(|b| !(b == b' ' || b == b'\t' || b.is_ascii_graphic()))
}

/// Encodes header text using RFC 2047 encoded-words when required.
///
/// Printable ASCII passes through untouched. Anything else becomes one or
/// more `=?UTF-8?Q?...?=` or `=?UTF-8?B?...?=` words, whichever scheme is
/// shorter for the whole text, each at most 75 characters and separated by
/// a single space. The result never contains CR or LF.
#[must_use]
pub fn encode_rfc2047(text: &str) -> String {
    if !needs_encoding(text) {
        return text.to_string();
    }

    let bytes = text.as_bytes();
    let encoding = if WordEncoding::Q.encoded_len(bytes) <= WordEncoding::B.encoded_len(bytes) {
        WordEncoding::Q
    } else {
        WordEncoding::B
    };
    encode_words(text, encoding)
}

/// Encodes `text` as encoded-words using a fixed scheme.
///
/// Chunks are split on character boundaries so every word decodes to valid
/// UTF-8 on its own.
#[must_use]
pub fn encode_words(text: &str, encoding: WordEncoding) -> String {
    let mut out = String::new();
    let mut chunk_start = 0;
    let mut chunk_end = 0;

    for (idx, ch) in text.char_indices() {
        let next_end = idx + ch.len_utf8();
        if chunk_end > chunk_start
            && encoding.encoded_len(&text.as_bytes()[chunk_start..next_end]) > MAX_ENCODED_TEXT_LEN
        {
            push_word(&mut out, &text.as_bytes()[chunk_start..chunk_end], encoding);
            chunk_start = chunk_end;
        }
        chunk_end = next_end;
    }
    if chunk_end > chunk_start || out.is_empty() {
        push_word(&mut out, &text.as_bytes()[chunk_start..chunk_end], encoding);
    }

    out
}

fn push_word(out: &mut String, bytes: &[u8], encoding: WordEncoding) {
    if !out.is_empty() {
        out.push(' ');
    }
    let _ = write!(out, "=?{CHARSET}?{}?", encoding.letter());
    encoding.encode_text(bytes, out);
    out.push_str("?=");
}

/// Decodes every RFC 2047 encoded-word in a header value.
///
/// Literal text is kept as is; whitespace that only separates two
/// encoded-words is dropped (RFC 2047 section 6.2).
///
/// # Errors
///
/// Returns an error if an encoded-word uses an unknown scheme or charset, or
/// if its payload is malformed.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (literal, candidate) = rest.split_at(start);
        if let Some((charset, encoding, payload, consumed)) = split_encoded_word(candidate) {
            if !(after_word && literal.chars().all(char::is_whitespace)) {
                out.push_str(literal);
            }
            out.push_str(&decode_word(charset, encoding, payload)?);
            rest = &candidate[consumed..];
            after_word = true;
        } else {
            out.push_str(literal);
            out.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }
    out.push_str(rest);

    Ok(out)
}

/// Splits `=?charset?e?payload?=` at the start of `s`.
fn split_encoded_word(s: &str) -> Option<(&str, &str, &str, usize)> {
    let inner = s.strip_prefix("=?")?;
    let (charset, after) = inner.split_once('?')?;
    let (encoding, after) = after.split_once('?')?;
    let end = after.find("?=")?;
    let payload = &after[..end];

    if charset.is_empty()
        || encoding.len() != 1
        || charset.contains(char::is_whitespace)
        || payload.contains(char::is_whitespace)
    {
        return None;
    }

    let consumed = 2 + charset.len() + 1 + encoding.len() + 1 + end + 2;
    Some((charset, encoding, payload, consumed))
}

fn decode_word(charset: &str, encoding: &str, payload: &str) -> Result<String> {
    let bytes = match encoding {
        "B" | "b" => decode_base64(payload)?,
        "Q" | "q" => decode_quoted_printable(&payload.replace('_', " "))?,
        other => {
            return Err(Error::InvalidEncoding(format!(
                "Unknown encoded-word scheme: {other}"
            )));
        }
    };

    // RFC 2231 allows a language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);
    if charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("us-ascii") {
        String::from_utf8(bytes).map_err(Into::into)
    } else if charset.eq_ignore_ascii_case("iso-8859-1") {
        Ok(bytes.into_iter().map(char::from).collect())
    } else {
        Err(Error::InvalidEncoding(format!(
            "Unsupported charset: {charset}"
        )))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(decode_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn test_base64url_has_no_padding() {
        let encoded = encode_base64url(b"<p>?</p>");
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(decode_base64url(&encoded).unwrap(), b"<p>?</p>");
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable("Hello").unwrap(), b"Hello");
        assert_eq!(
            decode_quoted_printable("H=C3=A9llo").unwrap(),
            "Héllo".as_bytes()
        );
        assert_eq!(
            decode_quoted_printable("Hello=\r\nWorld").unwrap(),
            b"HelloWorld"
        );
    }

    #[test]
    fn test_quoted_printable_decode_errors() {
        assert!(decode_quoted_printable("abc=4").is_err());
        assert!(decode_quoted_printable("abc=ZZ").is_err());
    }

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(encode_rfc2047("Hello"), "Hello");
        assert_eq!(encode_rfc2047("Re: [team] status, 50%"), "Re: [team] status, 50%");
    }

    #[test]
    fn test_non_ascii_is_encoded() {
        let encoded = encode_rfc2047("Héllo");
        assert!(encoded.starts_with("=?UTF-8?"));
        assert!(encoded.ends_with("?="));
        assert_eq!(decode_rfc2047(&encoded).unwrap(), "Héllo");
    }

    #[test]
    fn test_shorter_scheme_is_chosen() {
        // Mostly ASCII favours Q
        assert_eq!(
            encode_rfc2047("Caf\u{e9} ouvert"),
            "=?UTF-8?Q?Caf=C3=A9_ouvert?="
        );
        // Mostly non-ASCII favours B
        assert_eq!(encode_rfc2047("日本語"), "=?UTF-8?B?5pel5pys6Kqe?=");
    }

    #[test]
    fn test_control_characters_are_encoded() {
        let encoded = encode_rfc2047("line one\r\nBcc: victim@example.com");
        assert!(!encoded.contains('\r'));
        assert!(!encoded.contains('\n'));
        assert_eq!(
            decode_rfc2047(&encoded).unwrap(),
            "line one\r\nBcc: victim@example.com"
        );
    }

    #[test]
    fn test_encoded_word_lookalike_is_encoded() {
        let encoded = encode_rfc2047("=?x?y?z?=");
        assert_ne!(encoded, "=?x?y?z?=");
        assert_eq!(decode_rfc2047(&encoded).unwrap(), "=?x?y?z?=");
    }

    #[test]
    fn test_long_text_is_split_into_short_words() {
        let text = "ünïcödé ".repeat(20);
        let encoded = encode_rfc2047(&text);
        let words: Vec<&str> = encoded.split(' ').collect();
        assert!(words.len() > 1);
        for word in &words {
            assert!(word.len() <= 75, "word too long: {word}");
        }
        assert_eq!(decode_rfc2047(&encoded).unwrap(), text);
    }

    #[test]
    fn test_decode_mixed_literal_and_words() {
        let decoded = decode_rfc2047("Re: =?utf-8?q?caf=C3=A9?= =?UTF-8?B?IGNsdWI=?= today").unwrap();
        assert_eq!(decoded, "Re: café club today");
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_rfc2047("=?ISO-8859-1?Q?caf=E9?=").unwrap(), "café");
    }

    #[test]
    fn test_decode_rejects_unknown_scheme() {
        assert!(decode_rfc2047("=?UTF-8?X?abc?=").is_err());
    }

    #[test]
    fn test_decode_leaves_malformed_words() {
        assert_eq!(decode_rfc2047("a =? b").unwrap(), "a =? b");
    }

    proptest! {
        #[test]
        fn prop_encoded_header_text_round_trips(text in "\\PC{0,120}") {
            let encoded = encode_rfc2047(&text);
            prop_assert!(!encoded.contains('\r') && !encoded.contains('\n'));
            prop_assert_eq!(decode_rfc2047(&encoded).unwrap(), text);
        }

        #[test]
        fn prop_words_stay_within_limit(text in ".{1,200}") {
            let encoded = encode_rfc2047(&text);
            if needs_encoding(&text) {
                for word in encoded.split(' ') {
                    prop_assert!(word.len() <= 75);
                }
            }
        }
    }
}
