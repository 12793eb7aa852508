//! # Output Module
//!
//! This module centralizes all user-facing output for relicense.
//!
//! Per-file messages are printed while files are processed; a summary follows
//! at the end of the run. `-q` reduces stdout to the paths of patched files,
//! `-v` adds timing.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::ProcessingSummary;

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Patched
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Print the initial "Checking N files..." or "Processing N files..." message.
pub fn print_start_message(file_count: usize, check_only: bool) {
  if is_quiet() {
    return;
  }

  let verb = if check_only { "Checking" } else { "Processing" };
  println!("{} {} {}...", verb, file_count, plural(file_count, "file", "files"));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print `<path> was patched`, or `<path> would be patched` in check mode.
///
/// In quiet mode only the path is printed, for scripting.
pub fn print_patched(path: &Path, check_only: bool) {
  if is_quiet() {
    println!("{}", path.display());
    return;
  }

  let message = if check_only {
    format!("{} would be patched", path.display())
  } else {
    format!("{} was patched", path.display())
  };
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.green()));
}

/// Print `<path> is up to date`.
pub fn print_unchanged(path: &Path) {
  if is_quiet() {
    return;
  }

  println!("{} is up to date", path.display());
}

/// Print `<path> cannot be patched`.
pub fn print_cannot_be_patched(path: &Path) {
  if is_quiet() {
    return;
  }

  let message = format!("{} cannot be patched", path.display());
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.red()));
}

/// Print `Old header is not found in <path>`.
pub fn print_header_not_found(path: &Path) {
  if is_quiet() {
    return;
  }

  let message = format!("Old header is not found in {}", path.display());
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}

/// Print the success message when nothing needs to change.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All headers are up to date.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X patched, Y unchanged, Z cannot be patched, W ignored"
/// followed by the number of files where no old header was found. In verbose
/// mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let symbol = if summary.unpatchable > 0 {
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else if summary.patched > 0 {
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
  } else {
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
  };

  let patched_word = if check_only { "to patch" } else { "patched" };
  let unpatchable_str = if summary.unpatchable > 0 {
    summary
      .unpatchable
      .if_supports_color(Stream::Stdout, |s| s.red())
      .to_string()
  } else {
    summary
      .unpatchable
      .if_supports_color(Stream::Stdout, |s| s.cyan())
      .to_string()
  };

  let mut summary_line = format!(
    "{} Summary: {} {}, {} unchanged, {} cannot be patched, {} ignored",
    symbol,
    summary.patched.if_supports_color(Stream::Stdout, |s| s.cyan()),
    patched_word,
    summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    unpatchable_str,
    summary.ignored.if_supports_color(Stream::Stdout, |s| s.dimmed()),
  );

  if summary.header_not_found > 0 {
    summary_line.push_str(&format!(
      "; old header not found in {} {}",
      summary.header_not_found,
      plural(summary.header_not_found, "file", "files")
    ));
  }

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
  if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plural() {
    assert_eq!(plural(1, "file", "files"), "file");
    assert_eq!(plural(0, "file", "files"), "files");
    assert_eq!(plural(7, "file", "files"), "files");
  }
}
