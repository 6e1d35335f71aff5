//! # maildog-mime
//!
//! Permissive parser for raw email messages as shown in an inbox preview.
//!
//! ## Features
//!
//! - **Header parsing**: folded headers, case-insensitive lookup
//! - **Multipart**: boundary splitting with nested parts flattened into leaves
//! - **RFC 2047**: `Q` and `B` encoded words, decoded with their declared charset
//! - **List-Unsubscribe**: `mailto:` and URL targets (RFC 2369)
//!
//! Parsing never fails. Malformed input degrades to a partial or empty
//! result, and the reason is reported to a [`ParseObserver`] (by default,
//! to `tracing`).
//!
//! ## Quick Start
//!
//! ```
//! use maildog_mime::extract_mail;
//!
//! let raw = "From: sender@example.com\r\n\
//!            Subject: =?utf-8?Q?Hello_World?=\r\n\
//!            List-Unsubscribe: <https://example.com/unsub>\r\n\
//!            \r\n\
//!            Hello!";
//!
//! let mail = extract_mail(raw);
//! assert_eq!(mail.subject().as_deref(), Some("Hello World"));
//! assert_eq!(mail.parts[0].content, "Hello!");
//! assert_eq!(mail.list_unsubscribe().len(), 1);
//! ```
//!
//! ### Observing the parser
//!
//! ```
//! use std::cell::Cell;
//! use maildog_mime::{MailParser, ParseEvent, ParseObserver};
//!
//! #[derive(Default)]
//! struct CountSkips(Cell<usize>);
//!
//! impl ParseObserver for CountSkips {
//!     fn on_event(&self, event: &ParseEvent<'_>) {
//!         if matches!(event, ParseEvent::SegmentSkipped { .. }) {
//!             self.0.set(self.0.get() + 1);
//!         }
//!     }
//! }
//!
//! let skips = CountSkips::default();
//! let parser = MailParser::new().with_observer(&skips);
//! let parts = parser.parse_multipart("--b\nno separator\n--b--", "b");
//! assert!(parts.is_empty());
//! assert_eq!(skips.0.get(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod header;
mod message;
mod multipart;
mod options;
mod parser;
mod unsubscribe;

pub mod encoding;

pub use address::Mailbox;
pub use content_type::{ContentType, extract_boundary};
pub use encoding::decode_rfc2047;
pub use error::{Error, Result};
pub use header::{HeaderMap, parse_headers};
pub use message::{MailPart, ParsedMail, extract_mail};
pub use multipart::parse_multipart;
pub use options::{
    DEFAULT_MAX_DEPTH, HeaderSplit, ParseEvent, ParseObserver, ParseOptions, SkipReason,
    TracingObserver,
};
pub use parser::MailParser;
pub use unsubscribe::{UnsubscribeTarget, parse_list_unsubscribe};
