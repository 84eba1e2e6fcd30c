//! Transform command handlers
//!
//! Applies a record transform to newline-delimited JSON events read from
//! stdin and writes the resulting events to stdout, one per line.

use anyhow::{Context, Result};
use clap::Subcommand;
use lagwatch_core::transform::{Event, MaskProperty, Transform};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Transform subcommands
#[derive(Subcommand)]
pub enum TransformCommands {
    /// Replace a property with its base64-encoded form
    Mask {
        /// Property to mask
        #[arg(short, long)]
        property: String,
    },
}

/// Handle transform commands
pub fn handle_transform_command(command: TransformCommands) -> Result<()> {
    match command {
        TransformCommands::Mask { property } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let written = run_transform(&MaskProperty::new(property), stdin.lock(), stdout.lock())?;
            debug!("wrote {} events", written);
            Ok(())
        }
    }
}

/// Streams NDJSON events through `transform`
///
/// Blank lines are skipped. Returns the number of events written.
fn run_transform<T, R, W>(transform: &T, reader: R, mut writer: W) -> Result<usize>
where
    T: Transform + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut written = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: Event = serde_json::from_str(&line)
            .with_context(|| format!("Invalid event on line {}", index + 1))?;

        for event in transform.apply(event).into_events() {
            serde_json::to_writer(&mut writer, &event).context("Failed to write event")?;
            writeln!(writer)?;
            written += 1;
        }
    }

    writer.flush()?;
    Ok(written)
}
