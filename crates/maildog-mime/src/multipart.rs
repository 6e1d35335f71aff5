//! Multipart body splitting.

use crate::content_type::extract_boundary;
use crate::header::parse_headers;
use crate::message::MailPart;
use crate::options::{ParseEvent, SkipReason};
use crate::parser::MailParser;

/// Splits a multipart body into its leaf parts.
///
/// Shorthand for [`MailParser::parse_multipart`] with default options.
#[must_use]
pub fn parse_multipart(body: &str, boundary: &str) -> Vec<MailPart> {
    MailParser::new().parse_multipart(body, boundary)
}

impl MailParser<'_> {
    /// Splits a multipart body on `--{boundary}` into leaf parts.
    ///
    /// The preamble before the first delimiter is discarded, as are empty
    /// segments, the closing delimiter and segments with no blank line after
    /// their headers. Nested `multipart/*` parts are replaced by their own
    /// leaves, in order.
    #[must_use]
    pub fn parse_multipart(&self, body: &str, boundary: &str) -> Vec<MailPart> {
        let mut parts = Vec::new();
        self.collect_parts(body, boundary, 0, &mut parts);
        parts
    }

    fn collect_parts(&self, body: &str, boundary: &str, depth: usize, out: &mut Vec<MailPart>) {
        self.emit(&ParseEvent::Boundary { boundary, depth });
        let delimiter = format!("--{boundary}");

        for (index, segment) in body.split(delimiter.as_str()).enumerate().skip(1) {
            let raw = match classify_segment(segment) {
                Ok(raw) => raw,
                Err(reason) => {
                    self.emit(&ParseEvent::SegmentSkipped { index, reason });
                    continue;
                }
            };

            let headers = parse_headers(raw.header_text);
            let content_type = headers.get_or_empty("content-type").to_string();

            if content_type.contains("multipart/") {
                if let Ok(nested) = extract_boundary(&content_type) {
                    if depth < self.options().max_depth {
                        self.collect_parts(raw.content, nested, depth + 1, out);
                        continue;
                    }
                    self.emit(&ParseEvent::DepthLimitReached {
                        boundary: nested,
                        max_depth: self.options().max_depth,
                    });
                }
            }

            out.push(MailPart {
                headers,
                content: raw.content.trim().to_string(),
                content_type,
            });
        }
    }
}

/// A segment that has a header block and content.
struct RawSegment<'a> {
    header_text: &'a str,
    content: &'a str,
}

fn classify_segment(segment: &str) -> Result<RawSegment<'_>, SkipReason> {
    if segment.is_empty() {
        return Err(SkipReason::Empty);
    }
    if segment.trim().starts_with("--") {
        return Err(SkipReason::ClosingDelimiter);
    }

    let (start, end) = find_blank_line(segment).ok_or(SkipReason::MissingSeparator)?;
    Ok(RawSegment {
        header_text: &segment[..start],
        content: &segment[end..],
    })
}

/// Finds the leftmost `\r?\n\r?\n`, returning its start and end byte offsets.
pub(crate) fn find_blank_line(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();

    (0..bytes.len()).find_map(|start| {
        let mut pos = start;
        if bytes[pos] == b'\r' {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'\n') {
            return None;
        }
        pos += 1;
        if bytes.get(pos) == Some(&b'\r') {
            pos += 1;
        }
        (bytes.get(pos) == Some(&b'\n')).then_some((start, pos + 1))
    })
}
