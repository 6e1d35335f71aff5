//! Parser configuration and instrumentation.

use tracing::{debug, trace};

/// Default ceiling for nested multipart recursion.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth of multipart containers that will be descended into.
    pub max_depth: usize,
}

impl ParseOptions {
    /// Creates options with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the multipart recursion ceiling.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// How the header block was separated from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSplit {
    /// A line starting with `--` was found before any blank line.
    Delimiter,
    /// A blank line terminated the header block.
    BlankLine,
    /// No separator at all; the message is treated as empty.
    NotFound,
}

/// Why a multipart segment produced no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing between two delimiters.
    Empty,
    /// The closing `--boundary--` delimiter.
    ClosingDelimiter,
    /// No blank line between part headers and content.
    MissingSeparator,
}

/// Structured diagnostic emitted while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    /// The header/body split was located.
    HeaderSplit {
        /// Which separator was used.
        kind: HeaderSplit,
        /// Number of headers parsed from the header block.
        header_count: usize,
    },
    /// A multipart boundary was extracted from a content type.
    Boundary {
        /// The boundary token.
        boundary: &'a str,
        /// Nesting depth (0 for the top-level body).
        depth: usize,
    },
    /// A content type mentioned a boundary that could not be extracted.
    BoundaryUnreadable {
        /// The raw content type value.
        content_type: &'a str,
    },
    /// A multipart segment was dropped.
    SegmentSkipped {
        /// Zero-based segment index, counting the discarded preamble.
        index: usize,
        /// Why it was dropped.
        reason: SkipReason,
    },
    /// A nested container was kept as a leaf because the depth ceiling was hit.
    DepthLimitReached {
        /// The nested boundary that was not descended into.
        boundary: &'a str,
        /// The configured ceiling.
        max_depth: usize,
    },
}

/// Receives diagnostics from a [`MailParser`](crate::MailParser).
pub trait ParseObserver {
    /// Called for every parse event.
    fn on_event(&self, event: &ParseEvent<'_>);
}

/// Observer that forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_event(&self, event: &ParseEvent<'_>) {
        match event {
            ParseEvent::HeaderSplit { kind, header_count } => {
                trace!(?kind, header_count, "located header block");
            }
            ParseEvent::Boundary { boundary, depth } => {
                trace!(boundary, depth, "multipart boundary");
            }
            ParseEvent::BoundaryUnreadable { content_type } => {
                debug!(content_type, "unreadable boundary, treating as single part");
            }
            ParseEvent::SegmentSkipped { index, reason } => {
                trace!(index, ?reason, "skipped multipart segment");
            }
            ParseEvent::DepthLimitReached {
                boundary,
                max_depth,
            } => {
                debug!(boundary, max_depth, "multipart nesting too deep");
            }
        }
    }
}
