//! # Content Transformer Module
//!
//! The in-memory part of patching a file: split text into a line buffer,
//! swap the old header for the configured one, and join the lines back.

use tracing::trace;

use crate::formats::CommentStyle;
use crate::headers::{HeaderRegistry, MatchRange, VariantId};
use crate::rules::FileRule;

/// What happened to the header of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderOutcome {
  /// An old header was removed from the given range and a new one inserted.
  Replaced(MatchRange),
  /// No old header was found; the new one was inserted anyway.
  NotFound,
  /// The rule has no header; headers were left alone.
  Untouched,
}

impl HeaderOutcome {
  /// `Some(found)` when a header was looked for.
  pub const fn found(&self) -> Option<bool> {
    match self {
      Self::Replaced(_) => Some(true),
      Self::NotFound => Some(false),
      Self::Untouched => None,
    }
  }
}

/// Result of transforming one file's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
  pub lines: Vec<String>,
  pub outcome: HeaderOutcome,

  /// Hint for the next file.
  pub last_matched: Option<VariantId>,
}

/// Applies a file rule to a line buffer.
pub struct ContentTransformer<'a> {
  registry: &'a HeaderRegistry,
}

impl<'a> ContentTransformer<'a> {
  pub const fn new(registry: &'a HeaderRegistry) -> Self {
    Self { registry }
  }

  /// Rewrites `lines` according to `rule` in the comment `style` of the file.
  ///
  /// Trailing whitespace is trimmed first when the rule asks for it. Then, if
  /// the rule has a header, one old header is removed and the new one is
  /// inserted, whether or not an old header was found.
  pub fn transform(
    &self,
    mut lines: Vec<String>,
    rule: &FileRule,
    style: &CommentStyle,
    last_matched: Option<VariantId>,
  ) -> Transformed {
    if rule.rstrip() {
      rstrip_lines(&mut lines);
    }

    let Some(header) = rule.header() else {
      return Transformed {
        lines,
        outcome: HeaderOutcome::Untouched,
        last_matched,
      };
    };

    let removal = if rule.rstrip() {
      style.remove_stripped(&mut lines, self.registry, last_matched)
    } else {
      style.remove(&mut lines, self.registry, last_matched)
    };
    let outcome = match removal.removed {
      Some(range) => HeaderOutcome::Replaced(range),
      None => HeaderOutcome::NotFound,
    };

    trace!("Inserting {} header line(s) as {}", header.len(), style);
    style.insert(&mut lines, header);
    if rule.rstrip() {
      rstrip_lines(&mut lines);
    }

    Transformed {
      lines,
      outcome,
      last_matched: removal.last_matched,
    }
  }
}

fn rstrip_lines(lines: &mut [String]) {
  for line in lines {
    line.truncate(line.trim_end().len());
  }
}

/// Splits text into lines, dropping `\n` and `\r\n` terminators.
pub fn split_lines(content: &str) -> Vec<String> {
  content.lines().map(str::to_string).collect()
}

/// Joins lines with `\n` and terminates the last one.
///
/// An empty buffer stays empty.
pub fn join_lines(lines: &[String]) -> String {
  if lines.is_empty() {
    return String::new();
  }

  let mut content = lines.join("\n");
  content.push('\n');
  content
}
