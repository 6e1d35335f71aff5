//! Loading the raw message to inspect.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Email document as returned by the mail API.
///
/// Only the raw message matters here; the other fields are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct EmailDocument {
    /// IMAP UID of the message.
    #[serde(default)]
    pub imap_uid: Option<i64>,
    /// Full RFC 5322 message text.
    #[serde(default)]
    pub raw_message: Option<String>,
}

/// Where the message text comes from and how it is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// The input is the raw message itself.
    Raw,
    /// The input is an [`EmailDocument`] JSON object.
    Json,
}

/// Reads the message from `path`, or from `reader` when `path` is absent or `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not valid UTF-8, or is a
/// JSON document without a `raw_message`.
pub fn load(path: Option<&Path>, format: InputFormat, reader: impl Read) -> Result<String> {
    let text = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => read_all(reader)?,
    };

    match format {
        InputFormat::Raw => Ok(text),
        InputFormat::Json => raw_from_json(&text),
    }
}

fn read_all(mut reader: impl Read) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read message from stdin")?;
    Ok(text)
}

/// Extracts `raw_message` from an email JSON document.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or has no raw message.
pub fn raw_from_json(text: &str) -> Result<String> {
    let document: EmailDocument =
        serde_json::from_str(text).context("Input is not a valid email JSON document")?;

    match document.raw_message {
        Some(raw) => Ok(raw),
        None => bail!(
            "Email document {} has no raw_message",
            document
                .imap_uid
                .map_or_else(|| "(no uid)".to_string(), |uid| uid.to_string())
        ),
    }
}
