//! RFC 2047 encoded-word decoding for header values.
//!
//! Decoding is best-effort: malformed words are left in place instead of
//! failing the whole header.

use crate::error::Result;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Standard alphabet, padding optional. Mailers frequently drop the `=`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes Base64 data, accepting input with or without padding.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    LENIENT_BASE64.decode(data).map_err(Into::into)
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Folded lines are unfolded first, and whitespace between two adjacent
/// encoded words is dropped so that they concatenate. A word whose Base64
/// payload is invalid is kept verbatim.
///
/// ```
/// use maildog_mime::encoding::decode_rfc2047;
///
/// assert_eq!(decode_rfc2047("=?utf-8?Q?Hello_World?="), "Hello World");
/// assert_eq!(decode_rfc2047("=?utf-8?B?SGVsbG8=?="), "Hello");
/// ```
#[must_use]
pub fn decode_rfc2047(input: &str) -> String {
    let unfolded = unfold(input);
    let joined = join_adjacent_words(&unfolded);

    let mut result = String::with_capacity(joined.len());
    let mut rest = joined.as_str();

    while let Some(start) = rest.find("=?") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match EncodedWord::match_at(candidate) {
            Some(word) => {
                let original = &candidate[..word.len];
                match decode_encoded_word(word.charset, word.encoding, word.text) {
                    Ok(decoded) => result.push_str(&decoded),
                    Err(err) => {
                        tracing::debug!(word = original, %err, "leaving encoded word undecoded");
                        result.push_str(original);
                    }
                }
                rest = &candidate[word.len..];
            }
            None => {
                result.push('=');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Decodes the payload of a single encoded word.
///
/// `encoding` is the letter between the second and third `?`. Unknown
/// letters return `text` verbatim.
///
/// # Errors
///
/// Returns an error if a `B` payload is not valid Base64.
pub fn decode_encoded_word(charset: &str, encoding: char, text: &str) -> Result<String> {
    match encoding.to_ascii_uppercase() {
        'Q' => Ok(decode_q(charset, text)),
        'B' => {
            let bytes = decode_base64(text)?;
            let decoded = decode_charset(charset, &bytes)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes));
            Ok(decoded.into_owned())
        }
        _ => Ok(text.to_string()),
    }
}

/// A syntactically valid `=?charset?enc?text?=` token.
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: char,
    text: &'a str,
    /// Byte length of the whole token, delimiters included.
    len: usize,
}

impl<'a> EncodedWord<'a> {
    /// Matches an encoded word at the start of `s`, which begins with `=?`.
    fn match_at(s: &'a str) -> Option<Self> {
        let body = s.strip_prefix("=?")?;

        let charset_end = body.find('?')?;
        if charset_end == 0 {
            return None;
        }
        let charset = &body[..charset_end];

        let after_charset = &body[charset_end + 1..];
        let mut chars = after_charset.chars();
        let encoding = chars.next().filter(|c| matches!(c, 'B' | 'b' | 'Q' | 'q'))?;
        let after_encoding = chars.as_str().strip_prefix('?')?;

        let text_end = after_encoding.find('?')?;
        let text = &after_encoding[..text_end];
        if !after_encoding[text_end..].starts_with("?=") {
            return None;
        }

        // "=?" + charset + "?" + letter + "?" + text + "?="
        let len = 2 + charset_end + 1 + 1 + 1 + text_end + 2;
        Some(Self {
            charset,
            encoding,
            text,
            len,
        })
    }
}

/// Replaces `\r?\n` followed by spaces or tabs with a single space.
fn unfold(input: &str) -> Cow<'_, str> {
    if !input.contains('\n') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(newline) = rest.find('\n') {
        let after = &rest[newline + 1..];
        let folded = after.trim_start_matches([' ', '\t']);

        if folded.len() < after.len() {
            let before = &rest[..newline];
            out.push_str(before.strip_suffix('\r').unwrap_or(before));
            out.push(' ');
            rest = folded;
        } else {
            out.push_str(&rest[..=newline]);
            rest = after;
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Drops whitespace between `?=` and a following `=?`.
fn join_adjacent_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(end) = rest.find("?=") {
        let (head, tail) = rest.split_at(end + 2);
        out.push_str(head);

        let trimmed = tail.trim_start();
        rest = if trimmed.len() < tail.len() && trimmed.starts_with("=?") {
            trimmed
        } else {
            tail
        };
    }

    out.push_str(rest);
    out
}

/// Q encoding: `_` is a space, `=XX` is a byte in the declared charset.
fn decode_q(charset: &str, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = Vec::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if ch == '=' {
            let escaped = rest
                .get(1..3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = escaped {
                pending.push(byte);
                rest = &rest[3..];
                continue;
            }
        }

        if !pending.is_empty() {
            out.push_str(&decode_q_bytes(charset, &pending));
            pending.clear();
        }
        out.push(if ch == '_' { ' ' } else { ch });
        rest = &rest[ch.len_utf8()..];
    }

    if !pending.is_empty() {
        out.push_str(&decode_q_bytes(charset, &pending));
    }

    out
}

/// Q escapes in an unknown charset map each byte to the code point of the
/// same value.
fn decode_q_bytes<'b>(charset: &str, bytes: &'b [u8]) -> Cow<'b, str> {
    decode_charset(charset, bytes)
        .unwrap_or_else(|| Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
}

/// Decodes bytes in a named charset, or `None` if the label is unknown.
fn decode_charset<'b>(charset: &str, bytes: &'b [u8]) -> Option<Cow<'b, str>> {
    // RFC 2231 allows a language suffix: "utf-8*en"
    let label = charset.split('*').next().unwrap_or(charset).trim();

    let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
        tracing::trace!(charset, "unknown charset label");
        return None;
    };
    Some(encoding.decode_without_bom_handling(bytes).0)
}
