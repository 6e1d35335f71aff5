//! MIME header handling.

use std::collections::BTreeMap;
use std::fmt;

/// Header block of a message or part.
///
/// Names are stored lower-cased and hold a single value each: when a header
/// repeats, the later occurrence replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct HeaderMap {
    headers: BTreeMap<String, String>,
}

impl HeaderMap {
    /// Creates a new empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any existing value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Gets the value of a header (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Gets the value of a header, or an empty string when absent.
    #[must_use]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Checks whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_lowercase())
    }

    /// Number of distinct headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over `(name, value)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            // "content-type" -> "Content-Type"
            let capitalized = name
                .split('-')
                .map(|part| {
                    let mut chars = part.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_uppercase().collect::<String>() + chars.as_str()
                    })
                })
                .collect::<Vec<_>>()
                .join("-");

            writeln!(f, "{capitalized}: {value}")?;
        }

        Ok(())
    }
}

/// Parses a raw header block (no body) into a [`HeaderMap`].
///
/// Accepts `\n` or `\r\n` line endings. Lines starting with whitespace
/// continue the previous header and are joined to it with a single space.
/// A line that is neither a continuation nor `Name: value` resets the
/// current header, so a following continuation line has nothing to attach to.
#[must_use]
pub fn parse_headers(text: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut current_name = String::new();
    let mut current_value = String::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.starts_with(char::is_whitespace) && !current_name.is_empty() {
            current_value.push(' ');
            current_value.push_str(line.trim());
            continue;
        }

        if !current_name.is_empty() {
            headers.insert(&current_name, current_value.trim());
        }

        match line.find(':') {
            Some(colon) if colon > 0 => {
                current_name = line[..colon].trim().to_string();
                current_value = line[colon + 1..].trim().to_string();
            }
            _ => {
                current_name.clear();
                current_value.clear();
            }
        }
    }

    if !current_name.is_empty() {
        headers.insert(&current_name, current_value.trim());
    }

    headers
}
