//! `maildog` - inspect raw email messages from the command line
//!
//! Parses a message the way the inbox preview does and prints the result as JSON.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod input;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use maildog_mime::{HeaderMap, MailParser, MailPart, ParseOptions, UnsubscribeTarget};

use input::InputFormat;

#[derive(Debug, Parser)]
#[command(name = "maildog", version, about = "Parse a raw email message and print it as JSON")]
struct Cli {
    /// Raw message file; `-` or omitted reads stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Input is an email JSON document with a `raw_message` field
    #[arg(long)]
    json_input: bool,

    /// Print only the List-Unsubscribe targets
    #[arg(long)]
    unsubscribe: bool,

    /// Maximum nesting depth of multipart sections
    #[arg(long, env = "MAILDOG_MAX_DEPTH", default_value_t = maildog_mime::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Everything printed for one message.
#[derive(Debug, Serialize)]
struct Report<'a> {
    headers: &'a HeaderMap,
    parts: &'a [MailPart],
    unsubscribe: Vec<UnsubscribeTarget>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = if cli.json_input {
        InputFormat::Json
    } else {
        InputFormat::Raw
    };
    let raw = input::load(cli.file.as_deref(), format, io::stdin().lock())?;
    debug!(bytes = raw.len(), "loaded message");

    let parser = MailParser::new().with_options(ParseOptions::new().max_depth(cli.max_depth));
    let mail = parser.extract(&raw);
    info!(
        headers = mail.headers.len(),
        parts = mail.parts.len(),
        "parsed message"
    );

    let unsubscribe = mail.list_unsubscribe();
    let json = if cli.unsubscribe {
        to_json(&unsubscribe, cli.compact)?
    } else {
        to_json(
            &Report {
                headers: &mail.headers,
                parts: &mail.parts,
                unsubscribe,
            },
            cli.compact,
        )?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write output")?;
    Ok(())
}

fn to_json(value: &impl Serialize, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize parse result")
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "maildog=info,maildog_mime=info",
        1 => "maildog=debug,maildog_mime=debug",
        _ => "maildog=trace,maildog_mime=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "maildog",
            "--json-input",
            "--max-depth",
            "3",
            "-vv",
            "message.json",
        ])
        .unwrap();
        assert!(cli.json_input);
        assert_eq!(cli.max_depth, 3);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("message.json")));
    }

    #[test]
    fn test_report_json_shape() {
        let mail = maildog_mime::extract_mail(
            "Content-Type: text/plain\r\nList-Unsubscribe: <https://example.com/u>\r\n\r\nhi",
        );
        let report = Report {
            headers: &mail.headers,
            parts: &mail.parts,
            unsubscribe: mail.list_unsubscribe(),
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&report, true).unwrap()).unwrap();
        assert_eq!(value["headers"]["content-type"], "text/plain");
        assert_eq!(value["parts"][0]["contentType"], "text/plain");
        assert_eq!(value["parts"][0]["content"], "hi");
        assert_eq!(value["unsubscribe"][0]["kind"], "url");
        assert_eq!(value["unsubscribe"][0]["url"], "https://example.com/u");
    }
}
