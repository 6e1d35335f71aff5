//! Display helpers for address header values.

/// An address header value split into display name and address.
///
/// - `"Jane Doe <jane@example.com>"` → name `Jane Doe`, address `jane@example.com`
/// - `"jane@example.com"` → no name, address `jane@example.com`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mailbox {
    /// Display name, if one precedes the bracketed address.
    pub display_name: Option<String>,
    /// The bare address.
    pub address: String,
}

impl Mailbox {
    /// Parses a single address header value.
    ///
    /// Values without a bracketed part are kept whole as the address.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(open) = trimmed.find('<') {
            if let Some(close) = trimmed[open..].find('>') {
                let address = trimmed[open + 1..open + close].trim().to_string();
                let name = trimmed[..open].trim().trim_matches('"').trim();

                return Self {
                    display_name: (!name.is_empty()).then(|| name.to_string()),
                    address,
                };
            }
        }

        Self {
            display_name: None,
            address: trimmed.to_string(),
        }
    }

    /// Display name if present, otherwise the address.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_address() {
        let mailbox = Mailbox::parse("Jane Doe <jane@example.com>");
        assert_eq!(mailbox.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(mailbox.address, "jane@example.com");
        assert_eq!(mailbox.label(), "Jane Doe");
    }

    #[test]
    fn test_quoted_name() {
        let mailbox = Mailbox::parse("\"Doe, Jane\" <jane@example.com>");
        assert_eq!(mailbox.display_name.as_deref(), Some("Doe, Jane"));
    }

    #[test]
    fn test_bare_and_bracketed_address() {
        let bare = Mailbox::parse("  jane@example.com ");
        assert_eq!(bare.display_name, None);
        assert_eq!(bare.address, "jane@example.com");
        assert_eq!(bare.label(), "jane@example.com");

        let bracketed = Mailbox::parse("<jane@example.com>");
        assert_eq!(bracketed.display_name, None);
        assert_eq!(bracketed.address, "jane@example.com");
    }

    #[test]
    fn test_unclosed_bracket_kept_whole() {
        let mailbox = Mailbox::parse("Jane <jane@example.com");
        assert_eq!(mailbox.display_name, None);
        assert_eq!(mailbox.address, "Jane <jane@example.com");
    }
}
