//! CLI output formatting utilities.
//!
//! stdout carries the archive bytes during `build`, so status lines always go
//! to stderr. Only `inspect` prints its report to stdout.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

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

/// Kind of a status line on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Success,
  Error,
  Info,
}

impl Status {
  fn symbol(self) -> &'static str {
    match self {
      Status::Success => "✓",
      Status::Error => "✗",
      Status::Info => "•",
    }
  }

  fn color(self) -> AnsiColors {
    match self {
      Status::Success => AnsiColors::Green,
      Status::Error => AnsiColors::Red,
      Status::Info => AnsiColors::Blue,
    }
  }
}

/// Print a status line to stderr. Error messages are coloured as a whole.
pub fn print_status(status: Status, message: &str) {
  let color = status.color();
  let symbol_text = status.symbol();
  let symbol = symbol_text.if_supports_color(Stream::Stderr, |s| s.color(color));
  if status == Status::Error {
    eprintln!("{symbol} {}", message.if_supports_color(Stream::Stderr, |s| s.color(color)));
  } else {
    eprintln!("{symbol} {message}");
  }
}

/// Egg size for the build summary. Eggs stay well below a gigabyte.
pub fn format_size(bytes: u64) -> String {
  const KIB: u64 = 1024;
  const MIB: u64 = KIB * 1024;

  match bytes {
    b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
    b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
    b => format!("{b} bytes"),
  }
}

/// Build time in seconds, or milliseconds below one second.
pub fn format_elapsed(elapsed: Duration) -> String {
  if elapsed < Duration::from_secs(1) {
    format!("{}ms", elapsed.as_millis())
  } else {
    format!("{:.1}s", elapsed.as_secs_f64())
  }
}

pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;
  println!("{json}");
  Ok(())
}
