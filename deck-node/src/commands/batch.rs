//! # Batch Command
//!
//! Reads one command per line from stdin and runs each against the same
//! session, so cache state and statistics carry across lines.
//!
//! ```text
//! lookup "Lightning Bolt"
//! lookup "lightning bolt"
//! stats
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A failing line is
//! reported on stderr and the batch continues.

use anyhow::{bail, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::Session;
use crate::Commands;

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct BatchLine {
    #[command(subcommand)]
    command: Commands,
}

pub async fn run(session: &Session) -> Result<()> {
    let _sweeper = session.cache.start_configured_sweeper();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut failures = 0usize;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = match split_line(line) {
            Ok(args) => match BatchLine::try_parse_from(args) {
                Ok(parsed) => super::dispatch(session, parsed.command).await,
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            failures += 1;
            warn!(line = line_no, "Batch command failed: {:#}", e);
            eprintln!("line {}: {:#}", line_no, e);
        }
    }

    if failures > 0 {
        bail!("{} batch command(s) failed", failures);
    }
    Ok(())
}

/// Whitespace-separated words; double quotes group words containing spaces.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        bail!("unterminated quote");
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}
