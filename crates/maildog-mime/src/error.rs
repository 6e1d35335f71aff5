//! Error types for fallible parsing steps.
//!
//! The public parsing entry points never return these: they degrade to a
//! best-effort result instead. The errors exist for the lower-level helpers
//! (`ContentType::parse`, `decode_encoded_word`, `UnsubscribeTarget::parse`)
//! and for the diagnostics reported when a step is skipped.

use std::str::Utf8Error;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Unsubscribe target is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Percent-encoded text does not decode to UTF-8.
    #[error("Invalid percent-encoding: {0}")]
    InvalidPercentEncoding(#[from] Utf8Error),

    /// A `%` not followed by two hex digits.
    #[error("Malformed percent escape in {0}")]
    MalformedEscape(String),

    /// Content type declares no usable boundary.
    #[error("Missing boundary in multipart message")]
    MissingBoundary,
}
