//! List-Unsubscribe header resolution (RFC 2369).

use crate::encoding::decode_rfc2047;
use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use url::Url;

/// One way to unsubscribe from a mailing list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum UnsubscribeTarget {
    /// Send an email.
    Mailto {
        /// Recipient address, percent-decoded.
        address: String,
        /// `subject` query parameter, if present.
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        subject: Option<String>,
        /// Remaining query parameters in their original order.
        params: Vec<(String, String)>,
        /// The token as it appeared in the header, without angle brackets.
        raw: String,
    },
    /// Visit a URL.
    Url {
        /// The target URL.
        url: String,
        /// The token as it appeared in the header, without angle brackets.
        raw: String,
    },
}

impl UnsubscribeTarget {
    /// Parses a single bracket-stripped token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not an absolute URL, or if a
    /// `mailto:` address does not percent-decode to UTF-8.
    pub fn parse(token: &str) -> Result<Self> {
        let url = Url::parse(token)?;

        if url.scheme() != "mailto" {
            return Ok(Self::Url {
                url: token.to_string(),
                raw: token.to_string(),
            });
        }

        let path = url.path();
        if has_malformed_escape(path) {
            return Err(Error::MalformedEscape(path.to_string()));
        }
        let address = percent_decode_str(path).decode_utf8()?.into_owned();

        let mut subject = None;
        let mut params = Vec::new();
        for (key, value) in url.query_pairs() {
            if key == "subject" {
                if subject.is_none() {
                    subject = Some(value.into_owned());
                }
            } else {
                params.push((key.into_owned(), value.into_owned()));
            }
        }

        Ok(Self::Mailto {
            address,
            subject,
            params,
            raw: token.to_string(),
        })
    }

    /// The original token.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Mailto { raw, .. } | Self::Url { raw, .. } => raw,
        }
    }

    /// Checks whether this target is sent by email.
    #[must_use]
    pub const fn is_mailto(&self) -> bool {
        matches!(self, Self::Mailto { .. })
    }
}

/// Resolves a raw `List-Unsubscribe` header value into its targets.
///
/// Encoded words are decoded first. Tokens that are not valid URLs are
/// dropped; the remaining targets keep their header order and duplicates
/// are preserved.
///
/// ```
/// use maildog_mime::{UnsubscribeTarget, parse_list_unsubscribe};
///
/// let targets = parse_list_unsubscribe("<mailto:unsub@example.com>, <https://example.com/u>");
/// assert_eq!(targets.len(), 2);
/// assert!(targets[0].is_mailto());
/// assert!(matches!(targets[1], UnsubscribeTarget::Url { .. }));
/// ```
#[must_use]
pub fn parse_list_unsubscribe(raw_header: &str) -> Vec<UnsubscribeTarget> {
    let decoded = decode_rfc2047(raw_header);

    decoded
        .split(',')
        .map(strip_brackets)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match UnsubscribeTarget::parse(token) {
            Ok(target) => Some(target),
            Err(err) => {
                tracing::debug!(token, %err, "dropping unsubscribe target");
                None
            }
        })
        .collect()
}

/// Checks for a `%` that does not start a `%XX` escape.
fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

/// Trims a token and removes one leading `<` and one trailing `>`.
fn strip_brackets(token: &str) -> &str {
    let token = token.trim();
    let token = token.strip_prefix('<').unwrap_or(token);
    token.strip_suffix('>').unwrap_or(token)
}
