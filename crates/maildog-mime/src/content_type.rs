//! MIME content type handling.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters.get("boundary").map(String::as_str)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the type or subtype is missing.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts.next().unwrap_or_default().trim();
        if type_str.is_empty() {
            return Err(Error::InvalidContentType("Empty content type".to_string()));
        }

        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype in {type_str}")))?;

        let main_type = main_type.trim().to_lowercase();
        let sub_type = sub_type.trim().to_lowercase();
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(type_str.to_string()));
        }

        let mut content_type = Self::new(main_type, sub_type);

        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                content_type.parameters.insert(key, value);
            }
        }

        Ok(content_type)
    }
}

/// Extracts the `boundary=` token from a raw `Content-Type` value.
///
/// Tolerates an optional opening quote and stops at the first `"`, `;`,
/// line break or the end of the value. Unquoted tokens are trimmed of
/// surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::MissingBoundary`] if no `boundary=` parameter is present
/// or its token is empty.
pub fn extract_boundary(content_type: &str) -> Result<&str> {
    let start = find_ascii_case_insensitive(content_type, "boundary=")
        .ok_or(Error::MissingBoundary)?
        + "boundary=".len();

    let rest = &content_type[start..];
    let (rest, quoted) = rest
        .strip_prefix('"')
        .map_or((rest, false), |stripped| (stripped, true));

    let end = rest
        .find(|c: char| matches!(c, '"' | ';' | '\r' | '\n'))
        .unwrap_or(rest.len());

    let token = if quoted { &rest[..end] } else { rest[..end].trim() };

    if token.is_empty() {
        Err(Error::MissingBoundary)
    } else {
        Ok(token)
    }
}

/// Byte offset of the first ASCII case-insensitive match of `needle`.
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
