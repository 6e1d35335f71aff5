//! Parsed message structure and the header/body extractor.

use crate::address::Mailbox;
use crate::content_type::{ContentType, extract_boundary};
use crate::encoding::decode_rfc2047;
use crate::header::{HeaderMap, parse_headers};
use crate::multipart::find_blank_line;
use crate::options::{HeaderSplit, ParseEvent};
use crate::parser::MailParser;
use crate::unsubscribe::{UnsubscribeTarget, parse_list_unsubscribe};
use chrono::{DateTime, FixedOffset};

/// One leaf content unit of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct MailPart {
    /// Headers local to this part.
    pub headers: HeaderMap,
    /// Raw, undecoded body text.
    pub content: String,
    /// Raw `Content-Type` value, or empty.
    pub content_type: String,
}

impl MailPart {
    /// Parses [`content_type`](Self::content_type) into a [`ContentType`].
    ///
    /// Returns `None` if the value is empty or malformed.
    #[must_use]
    pub fn parsed_content_type(&self) -> Option<ContentType> {
        ContentType::parse(&self.content_type).ok()
    }

    /// Checks whether this part is `main/sub` (case-insensitive).
    #[must_use]
    pub fn is_mime_type(&self, main_type: &str, sub_type: &str) -> bool {
        self.parsed_content_type().is_some_and(|ct| {
            ct.main_type.eq_ignore_ascii_case(main_type) && ct.sub_type.eq_ignore_ascii_case(sub_type)
        })
    }
}

/// Result of parsing a raw message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedMail {
    /// Top-level headers.
    pub headers: HeaderMap,
    /// Leaf parts in order of appearance.
    pub parts: Vec<MailPart>,
}

impl ParsedMail {
    /// Gets the Subject header with encoded words decoded.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.headers.get("subject").map(decode_rfc2047)
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Splits the From header into display name and address.
    #[must_use]
    pub fn from_mailbox(&self) -> Option<Mailbox> {
        self.from().map(|from| Mailbox::parse(&decode_rfc2047(from)))
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Sender header.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.headers.get("sender")
    }

    /// Gets the Reply-To header.
    #[must_use]
    pub fn reply_to(&self) -> Option<&str> {
        self.headers.get("reply-to")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }

    /// Parses the Date header (RFC 2822).
    #[must_use]
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.headers.get("date")?;
        DateTime::parse_from_rfc2822(raw.trim()).ok()
    }

    /// Resolves the List-Unsubscribe header, if any.
    #[must_use]
    pub fn list_unsubscribe(&self) -> Vec<UnsubscribeTarget> {
        self.headers
            .get("list-unsubscribe")
            .map(parse_list_unsubscribe)
            .unwrap_or_default()
    }

    /// Finds the first text/plain part.
    #[must_use]
    pub fn text_part(&self) -> Option<&MailPart> {
        self.parts.iter().find(|part| part.is_mime_type("text", "plain"))
    }

    /// Finds the first text/html part.
    #[must_use]
    pub fn html_part(&self) -> Option<&MailPart> {
        self.parts.iter().find(|part| part.is_mime_type("text", "html"))
    }
}

/// Parses a raw message with default options.
///
/// Shorthand for [`MailParser::extract`].
#[must_use]
pub fn extract_mail(raw_mail: &str) -> ParsedMail {
    MailParser::new().extract(raw_mail)
}

impl MailParser<'_> {
    /// Parses a raw message into headers and leaf parts.
    ///
    /// Never fails: a message without any header/body separator yields an
    /// empty result, and a content type whose boundary cannot be read is
    /// treated as a single part holding the whole body.
    #[must_use]
    pub fn extract(&self, raw_mail: &str) -> ParsedMail {
        let Some(split) = locate_body(raw_mail) else {
            self.emit(&ParseEvent::HeaderSplit {
                kind: HeaderSplit::NotFound,
                header_count: 0,
            });
            return ParsedMail::default();
        };

        let headers = parse_headers(&raw_mail[..split.header_end]);
        let body = &raw_mail[split.body_start..];
        self.emit(&ParseEvent::HeaderSplit {
            kind: split.kind,
            header_count: headers.len(),
        });

        let content_type = headers.get_or_empty("content-type");

        let parts = match extract_boundary(content_type) {
            Ok(boundary) => self.parse_multipart(body, boundary),
            Err(_) => {
                if content_type.to_ascii_lowercase().contains("boundary=") {
                    self.emit(&ParseEvent::BoundaryUnreadable { content_type });
                }
                vec![MailPart {
                    headers: headers.clone(),
                    content: body.to_string(),
                    content_type: content_type.to_string(),
                }]
            }
        };

        ParsedMail { headers, parts }
    }
}

/// Where the header block ends and the body starts.
struct BodySplit {
    header_end: usize,
    body_start: usize,
    kind: HeaderSplit,
}

/// Picks the earliest of the first delimiter line and the first blank line.
///
/// For a delimiter the body starts at its `--` so the splitter sees it; for a
/// blank line the body starts right after it.
///
/// Checking the delimiter first and only then the blank line would split a
/// single-part body at a `-- ` signature line, so the two are compared by
/// position instead.
fn locate_body(raw: &str) -> Option<BodySplit> {
    let delimiter = raw.find("\n--").map(|newline| {
        let header_end = if raw[..newline].ends_with('\r') {
            newline - 1
        } else {
            newline
        };
        BodySplit {
            header_end,
            body_start: newline + 1,
            kind: HeaderSplit::Delimiter,
        }
    });

    let blank = find_blank_line(raw).map(|(start, end)| BodySplit {
        header_end: start,
        body_start: end,
        kind: HeaderSplit::BlankLine,
    });

    match (delimiter, blank) {
        (Some(d), Some(b)) => Some(if d.header_end < b.header_end { d } else { b }),
        (d, b) => d.or(b),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_extract_single_part() {
        let raw = "From: sender@example.com\r\nSubject: Test\r\n\r\nHello, World!\r\n";
        let mail = extract_mail(raw);

        assert_eq!(mail.from(), Some("sender@example.com"));
        assert_eq!(mail.from_mailbox().unwrap().address, "sender@example.com");
        assert_eq!(mail.subject().as_deref(), Some("Test"));
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "Hello, World!\r\n");
        assert_eq!(mail.parts[0].content_type, "");
        assert_eq!(mail.parts[0].headers, mail.headers);
    }

    #[test]
    fn test_extract_no_separator_is_empty() {
        let mail = extract_mail("Subject: no body at all");
        assert!(mail.headers.is_empty());
        assert!(mail.parts.is_empty());
        assert_eq!(extract_mail(""), ParsedMail::default());
    }

    #[test]
    fn test_extract_multipart_crlf() {
        let raw = concat!(
            "From: a@example.com\r\n",
            "Content-Type: multipart/alternative; boundary=\"b1\"\r\n",
            "\r\n",
            "This is a multi-part message.\r\n",
            "--b1\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "Plain\r\n",
            "--b1\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "\r\n",
            "<p>Html</p>\r\n",
            "--b1--\r\n",
        );

        let mail = extract_mail(raw);
        assert_eq!(mail.from(), Some("a@example.com"));
        assert_eq!(mail.parts.len(), 2);
        assert_eq!(mail.text_part().unwrap().content, "Plain");
        assert_eq!(mail.html_part().unwrap().content, "<p>Html</p>");
    }

    #[test]
    fn test_extract_delimiter_directly_after_headers() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=zz;\r\n",
            "--zz\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "first\r\n",
            "--zz--",
        );

        let mail = extract_mail(raw);
        assert_eq!(
            mail.headers.get("content-type"),
            Some("multipart/mixed; boundary=zz;")
        );
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "first");
    }

    #[test]
    fn test_extract_delimiter_lf_keeps_first_part() {
        let raw = "Content-Type: multipart/mixed; boundary=\"q\"\n--q\n\none\n--q\n\ntwo\n--q--\n";
        let mail = extract_mail(raw);
        let contents: Vec<&str> = mail.parts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn test_extract_body_with_signature_dashes() {
        let raw = "Subject: hi\n\nBody text\n-- \nsignature\n";
        let mail = extract_mail(raw);
        assert_eq!(mail.subject().as_deref(), Some("hi"));
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "Body text\n-- \nsignature\n");
    }

    #[test]
    fn test_extract_unreadable_boundary_falls_back_to_single_part() {
        let raw = "Content-Type: multipart/mixed; boundary=\"\"\n\nbody";
        let mail = extract_mail(raw);
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "body");
        assert_eq!(mail.parts[0].content_type, "multipart/mixed; boundary=\"\"");
    }

    #[test]
    fn test_extract_boundary_parameter_any_case() {
        let raw = "Content-Type: multipart/mixed; Boundary=\"x\"\n\n--x\n\nA\n--x--\n";
        let mail = extract_mail(raw);
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "A");
        assert_eq!(mail.parts[0].content_type, "");
    }

    #[test]
    fn test_extract_folded_content_type() {
        let raw = concat!(
            "Content-Type: multipart/mixed;\r\n",
            "\tboundary=\"folded\"\r\n",
            "\r\n",
            "--folded\r\n",
            "\r\n",
            "only\r\n",
            "--folded--\r\n",
        );
        let mail = extract_mail(raw);
        assert_eq!(mail.parts.len(), 1);
        assert_eq!(mail.parts[0].content, "only");
    }

    #[test]
    fn test_accessors() {
        let raw = concat!(
            "Subject: =?utf-8?Q?caf=C3=A9?=\n",
            "Sender: list@example.com\n",
            "Reply-To: Someone <someone@example.com>\n",
            "Message-ID: <abc@example.com>\n",
            "Date: Tue, 1 Jul 2003 10:52:37 +0200\n",
            "List-Unsubscribe: <https://example.com/u>\n",
            "\n",
            "x",
        );
        let mail = extract_mail(raw);

        assert_eq!(mail.subject().as_deref(), Some("café"));
        assert_eq!(mail.sender(), Some("list@example.com"));
        assert_eq!(mail.reply_to(), Some("Someone <someone@example.com>"));
        assert_eq!(mail.message_id(), Some("<abc@example.com>"));
        assert_eq!(mail.to(), None);
        assert_eq!(mail.date().unwrap().year(), 2003);
        assert_eq!(mail.list_unsubscribe().len(), 1);
    }

    #[test]
    fn test_malformed_date_is_none() {
        let mail = extract_mail("Date: yesterday\n\nx");
        assert!(mail.date().is_none());
        assert!(mail.list_unsubscribe().is_empty());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let raw = "Content-Type: multipart/mixed; boundary=\"d\"\n\n--d\n\na\n--d--\n";
        assert_eq!(extract_mail(raw), extract_mail(raw));
    }
}
