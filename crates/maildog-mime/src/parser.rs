//! Configurable parser entry point.

use crate::options::{ParseEvent, ParseObserver, ParseOptions, TracingObserver};

/// Raw message parser.
///
/// Holds the [`ParseOptions`] and the observer that receives diagnostics.
/// The free functions [`extract_mail`](crate::extract_mail) and
/// [`parse_multipart`](crate::parse_multipart) use `MailParser::default()`.
///
/// ```
/// use maildog_mime::{MailParser, ParseOptions};
///
/// let parser = MailParser::new().with_options(ParseOptions::new().max_depth(4));
/// let mail = parser.extract("Subject: hi\r\n\r\nbody");
/// assert_eq!(mail.parts.len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct MailParser<'o> {
    options: ParseOptions,
    observer: &'o dyn ParseObserver,
}

impl MailParser<'static> {
    /// Creates a parser with default options that reports to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ParseOptions::new(),
            observer: &TracingObserver,
        }
    }
}

impl Default for MailParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> MailParser<'o> {
    /// Replaces the parser options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Routes diagnostics to `observer` instead of `tracing`.
    #[must_use]
    pub fn with_observer<'n>(self, observer: &'n dyn ParseObserver) -> MailParser<'n> {
        MailParser {
            options: self.options,
            observer,
        }
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> ParseOptions {
        self.options
    }

    pub(crate) fn emit(&self, event: &ParseEvent<'_>) {
        self.observer.on_event(event);
    }
}

impl std::fmt::Debug for MailParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
