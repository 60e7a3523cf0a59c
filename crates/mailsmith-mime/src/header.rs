//! Header field encoding.

use crate::address::{Mailbox, parse_mailbox};
use crate::encoding::encode_rfc2047;
use crate::error::{AddressField, Error, Result};
use std::io::Write;

/// Parses every address of one field, failing on the first bad entry.
///
/// # Errors
///
/// Returns `Error::AddressSyntax` naming `field` and the offending input.
pub fn parse_addresses<S: AsRef<str>>(field: AddressField, addresses: &[S]) -> Result<Vec<Mailbox>> {
    addresses
        .iter()
        .map(|raw| parse_mailbox(raw.as_ref()).map_err(|source| Error::address(field, source)))
        .collect()
}

/// Writes `Field: addr1, addr2\r\n`, or nothing when `addresses` is empty.
///
/// Every address is parsed and re-rendered canonically; no line folding is
/// performed. Returns the parsed mailboxes.
///
/// # Errors
///
/// Returns an error if an address does not parse or the writer fails.
pub fn write_address_header<W, S>(
    w: &mut W,
    field: AddressField,
    addresses: &[S],
) -> Result<Vec<Mailbox>>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let mailboxes = parse_addresses(field, addresses)?;
    write_mailboxes(w, field, &mailboxes)?;
    Ok(mailboxes)
}

/// Writes an address header from already parsed mailboxes.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_mailboxes<W: Write + ?Sized>(
    w: &mut W,
    field: AddressField,
    mailboxes: &[Mailbox],
) -> Result<()> {
    let Some((first, rest)) = mailboxes.split_first() else {
        return Ok(());
    };
    write!(w, "{field}: {first}")?;
    for mailbox in rest {
        write!(w, ", {mailbox}")?;
    }
    w.write_all(b"\r\n")?;
    Ok(())
}

/// Encodes a subject for use as an unstructured header value.
///
/// Printable ASCII is returned unchanged; anything else becomes RFC 2047
/// encoded-words. The result never contains CR or LF.
#[must_use]
pub fn encode_subject(subject: &str) -> String {
    encode_rfc2047(subject)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encoding::decode_rfc2047;

    fn render(field: AddressField, addresses: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        write_address_header(&mut out, field, addresses)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_address() {
        assert_eq!(
            render(AddressField::To, &["user@example.com"]).unwrap(),
            "To: <user@example.com>\r\n"
        );
    }

    #[test]
    fn test_address_list() {
        assert_eq!(
            render(
                AddressField::Cc,
                &["A User <a@example.com>", "b@example.com", "\"C\" <c@example.com>"]
            )
            .unwrap(),
            "Cc: \"A User\" <a@example.com>, <b@example.com>, \"C\" <c@example.com>\r\n"
        );
    }

    #[test]
    fn test_empty_list_writes_nothing() {
        let empty: [&str; 0] = [];
        assert_eq!(render(AddressField::Cc, &empty).unwrap(), "");
    }

    #[test]
    fn test_bad_address_names_field() {
        let err = render(AddressField::To, &["ok@example.com", "not-an-address"]).unwrap_err();
        match err {
            Error::AddressSyntax { field, source } => {
                assert_eq!(field, AddressField::To);
                assert_eq!(source.input(), "not-an-address");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_returns_parsed_mailboxes() {
        let mut out = Vec::new();
        let parsed =
            write_address_header(&mut out, AddressField::From, &["Ann <ann@example.com>"]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].address, "ann@example.com");
    }

    #[test]
    fn test_ascii_subject_passes_through() {
        assert_eq!(encode_subject("Hello"), "Hello");
        assert_eq!(encode_subject("Re: [list] a, b; c"), "Re: [list] a, b; c");
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let encoded = encode_subject("Héllo");
        assert!(encoded.starts_with("=?UTF-8?"));
        assert_eq!(decode_rfc2047(&encoded).unwrap(), "Héllo");
    }

    #[test]
    fn test_line_breaks_never_leak() {
        let encoded = encode_subject("Hi\r\nBcc: victim@example.com");
        assert!(!encoded.contains('\r'));
        assert!(!encoded.contains('\n'));
        assert_eq!(
            decode_rfc2047(&encoded).unwrap(),
            "Hi\r\nBcc: victim@example.com"
        );
    }
}
