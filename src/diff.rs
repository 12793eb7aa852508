//! # Diff Module
//!
//! Renders line diffs between a file's current and patched content.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff rendering for patched files.
pub struct DiffManager {
  /// Whether to print diffs at all
  pub show_diff: bool,
}

impl DiffManager {
  pub const fn new(show_diff: bool) -> Self {
    Self { show_diff }
  }

  /// Renders the diff between `original` and `new` as text.
  ///
  /// Every line is prefixed with `-`, `+` or a space, under a
  /// `Diff for <path>:` heading.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);

    let mut content = format!("Diff for {}:\n", path.display());
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      content.push_str(sign);
      content.push_str(change.value());
      if change.missing_newline() {
        content.push('\n');
      }
    }

    content
  }

  /// Prints the diff to stderr when diffs are enabled.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) {
    if !self.show_diff {
      return;
    }

    for line in Self::render(path, original, new).lines() {
      match line.chars().next() {
        Some('-') => eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
        Some('+') => eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green())),
        _ => eprintln!("{}", line),
      }
    }
    eprintln!();
  }
}
