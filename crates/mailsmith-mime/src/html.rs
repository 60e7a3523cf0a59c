//! Minimal XHTML document shell for HTML bodies.

const DOCTYPE: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
                       \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">";

/// Wraps an HTML body element in an XHTML 1.0 Strict document.
///
/// `title` is entity-escaped; `body` is inserted verbatim and is expected to
/// be a complete `<body>...</body>` element.
#[must_use]
pub fn document(title: &str, body: &[u8]) -> Vec<u8> {
    let head = format!(
        "{DOCTYPE}\n\
         <html>\n\
         <head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n\
         <meta name=\"viewport\" content=\"width=device-width\"/>\n\
         <title>{}</title>\n\
         </head>\n",
        escape(title)
    );

    let mut out = Vec::with_capacity(head.len() + body.len() + 8);
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\n</html>");
    out
}

/// Escapes the five HTML special characters.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("Tom & \"Jerry\" <'cat'>"),
            "Tom &amp; &#34;Jerry&#34; &lt;&#39;cat&#39;&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_document_shell() {
        let doc = String::from_utf8(document("News & <Views>", b"<body><p>hi</p></body>")).unwrap();
        assert_eq!(
            doc,
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
             <html>\n\
             <head>\n\
             <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n\
             <meta name=\"viewport\" content=\"width=device-width\"/>\n\
             <title>News &amp; &lt;Views&gt;</title>\n\
             </head>\n\
             <body><p>hi</p></body>\n\
             </html>"
        );
    }
}
