//! Terminal reporting for `generate`, `plan` and `info`.
//!
//! Every command prints either a text report or, with `-o json`, one JSON
//! document on stdout. Status lines go through the `print_*` helpers so their
//! markers are colored only when stdout supports it. Errors go to stderr.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  /// Marks a solution heading in `plan`.
  pub const SOLUTION: &str = "•";
  /// Separates the ends of a dependency edge.
  pub const EDGE: &str = "→";
  /// A description file that was written.
  pub const WRITTEN: &str = "+";
  /// A description file a dry run would write.
  pub const PENDING: &str = "~";
}

/// Characters of the composition hash shown in text reports.
const SHORT_HASH_LEN: usize = 12;

/// Shorten a composition hash for text output. JSON output keeps it whole.
pub fn short_hash(hash: &str) -> &str {
  &hash[..hash.len().min(SHORT_HASH_LEN)]
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// One line per description file, marked written or pending.
pub fn print_file(path: &Path, written: bool) {
  let marker = if written { symbols::WRITTEN } else { symbols::PENDING };
  println!(
    "  {} {}",
    marker.if_supports_color(Stream::Stdout, |s| s.green()),
    path.display()
  );
}

/// Bold solution name under a colored marker.
pub fn print_solution_heading(name: &str) {
  println!(
    "{} {}",
    symbols::SOLUTION.if_supports_color(Stream::Stdout, |s| s.blue()),
    name.if_supports_color(Stream::Stdout, |s| s.bold())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
