//! # Header Remover
//!
//! Removes one existing header block from a file's lines. The block is located
//! with the [`matcher`](super::matcher), then widened to swallow copyright
//! lines that sit right next to it and any blank padding around it.

use tracing::{debug, trace};

use super::matcher::{MatchRange, find_block};
use super::{HeaderRegistry, VariantId};

/// How many lines above and below a matched block are searched for stray
/// copyright lines.
pub const COPYRIGHT_DELTA: usize = 3;

/// Result of a removal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
  /// The deleted range, as it was before deletion. `None` if no header was
  /// found.
  pub removed: Option<MatchRange>,

  /// The variant to try first on the next file. Unchanged when nothing
  /// matched.
  pub last_matched: Option<VariantId>,
}

/// Finds and deletes one header block from `lines`.
///
/// `candidate` yields the text each registry variant is expected to have in
/// this file, typically the variant rendered in the file's comment style. The
/// hint `last_matched` is tried first; on a miss every variant of `registry`
/// is tried in registration order and the first hit becomes the new hint.
///
/// If nothing matches, `lines` is left untouched.
pub fn remove_header<F>(
  lines: &mut Vec<String>,
  registry: &HeaderRegistry,
  last_matched: Option<VariantId>,
  mut candidate: F,
) -> Removal
where
  F: FnMut(VariantId) -> Option<Vec<String>>,
{
  let mut try_variant = |id: VariantId| candidate(id).and_then(|header| find_block(&header, lines.as_slice()));

  let found = last_matched
    .and_then(|id| try_variant(id).map(|range| (id, range)))
    .or_else(|| {
      registry
        .iter()
        .find_map(|(id, _)| try_variant(id).map(|range| (id, range)))
    });

  let Some((id, range)) = found else {
    return Removal {
      removed: None,
      last_matched,
    };
  };

  if last_matched != Some(id) {
    debug!("Switching header hint to variant {}", id);
  }

  let range = widen(lines, range);
  trace!("Removing lines {}..{}", range.start, range.end);
  lines.drain(range.clone());

  Removal {
    removed: Some(range),
    last_matched: Some(id),
  }
}

/// Grows a matched block over nearby copyright lines, then over adjacent blank
/// lines.
///
/// Copyright lines are only looked for within [`COPYRIGHT_DELTA`] lines of the
/// block as it was matched, in either direction.
pub fn widen<L: AsRef<str>>(lines: &[L], matched: MatchRange) -> MatchRange {
  let (mut start, mut end) = (matched.start, matched.end);

  for offset in (matched.start.saturating_sub(COPYRIGHT_DELTA)..matched.start).rev() {
    if mentions_copyright(lines[offset].as_ref()) {
      start = offset;
    }
  }

  for offset in matched.end..(matched.end + COPYRIGHT_DELTA).min(lines.len()) {
    if mentions_copyright(lines[offset].as_ref()) {
      end = offset + 1;
    }
  }

  while start > 0 && is_blank(lines[start - 1].as_ref()) {
    start -= 1;
  }
  while end < lines.len() && is_blank(lines[end].as_ref()) {
    end += 1;
  }

  start..end
}

fn mentions_copyright(line: &str) -> bool {
  line.to_lowercase().contains("copyright")
}

fn is_blank(line: &str) -> bool {
  line.trim().is_empty()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn buffer(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
  }

  fn registry_of(headers: &[&[&str]]) -> HeaderRegistry {
    let mut registry = HeaderRegistry::new();
    for (i, header) in headers.iter().enumerate() {
      registry.register_lines(format!("h{i}"), buffer(header));
    }
    registry
  }

  /// Matches registry variants verbatim.
  fn plain(registry: &HeaderRegistry) -> impl FnMut(VariantId) -> Option<Vec<String>> + '_ {
    |id| registry.get(id).map(|v| v.lines().to_vec())
  }

  /// Matches registry variants as `# ` line comments.
  fn hashed(registry: &HeaderRegistry) -> impl FnMut(VariantId) -> Option<Vec<String>> + '_ {
    |id| registry.get(id).map(|v| v.lines().iter().map(|l| format!("# {l}")).collect())
  }

  #[test]
  fn test_remove_scenario_with_shebang() {
    let registry = registry_of(&[&["Copyright 2019 A", "MPL 2.0"]]);
    let mut lines = buffer(&["#!/usr/bin/env python", "# Copyright 2018 A", "# MPL 2.0", "", "print(1)"]);

    let removal = remove_header(&mut lines, &registry, None, hashed(&registry));

    assert_eq!(removal.removed, Some(1..4));
    assert_eq!(removal.last_matched.map(VariantId::index), Some(0));
    assert_eq!(lines, ["#!/usr/bin/env python", "print(1)"]);
  }

  #[test]
  fn test_remove_not_found_leaves_buffer() {
    let registry = registry_of(&[&["Copyright 2019 A", "MPL 2.0"]]);
    let original = buffer(&["fn main() {}", "", "// nothing to see", ""]);
    let mut lines = original.clone();

    let removal = remove_header(&mut lines, &registry, None, plain(&registry));

    assert_eq!(removal.removed, None);
    assert_eq!(removal.last_matched, None);
    assert_eq!(lines, original);
  }

  #[test]
  fn test_remove_keeps_hint_when_nothing_matches() {
    let registry = registry_of(&[&["alpha beta gamma"]]);
    let mut lines = buffer(&["unrelated", "text"]);
    let hint = registry.iter().next().map(|(id, _)| id);

    let removal = remove_header(&mut lines, &registry, hint, plain(&registry));

    assert_eq!(removal.removed, None);
    assert_eq!(removal.last_matched, hint);
  }

  #[test]
  fn test_remove_tries_hint_first() {
    let registry = registry_of(&[&["first header text"], &["second header text"]]);
    let second = registry.iter().nth(1).map(|(id, _)| id);
    let mut lines = buffer(&["first header text", "second header text", "code"]);

    let mut asked = Vec::new();
    let removal = remove_header(&mut lines, &registry, second, |id| {
      asked.push(id.index());
      registry.get(id).map(|v| v.lines().to_vec())
    });

    assert_eq!(asked, [1]);
    assert_eq!(removal.removed, Some(1..2));
    assert_eq!(lines, ["first header text", "code"]);
  }

  #[test]
  fn test_remove_falls_back_to_registry_order() {
    let registry = registry_of(&[&["zzzz zzzz zzzz"], &["first header text"], &["second header text"]]);
    let stale = registry.iter().next().map(|(id, _)| id);
    let mut lines = buffer(&["second header text", "first header text", "code"]);

    let removal = remove_header(&mut lines, &registry, stale, plain(&registry));

    assert_eq!(removal.last_matched.map(VariantId::index), Some(1));
    assert_eq!(removal.removed, Some(1..2));
  }

  #[test]
  fn test_copyright_exactly_delta_lines_above_is_absorbed() {
    let lines = buffer(&["x", "Copyright 2000 Someone", "a", "b", "HEADER", "code", "more"]);

    assert_eq!(widen(&lines, 4..5), 1..5);
  }

  #[test]
  fn test_copyright_beyond_delta_lines_above_is_kept() {
    let lines = buffer(&["Copyright 2000 Someone", "a", "b", "c", "HEADER", "code", "more"]);

    assert_eq!(widen(&lines, 4..5), 4..5);
  }

  #[test]
  fn test_copyright_exactly_delta_lines_below_is_absorbed() {
    let lines = buffer(&["HEADER", "a", "b", "(c) COPYRIGHT holders", "code"]);

    assert_eq!(widen(&lines, 0..1), 0..4);
  }

  #[test]
  fn test_copyright_beyond_delta_lines_below_is_kept() {
    let lines = buffer(&["HEADER", "a", "b", "c", "Copyright holders", "code"]);

    assert_eq!(widen(&lines, 0..1), 0..1);
  }

  #[test]
  fn test_copyright_window_is_measured_from_matched_block() {
    // A chain of copyright lines is only absorbed up to COPYRIGHT_DELTA lines
    // from the original match, even though each gap is a single line.
    let lines = buffer(&[
      "code",
      "copyright 4",
      "copyright 3",
      "copyright 2",
      "copyright 1",
      "HEADER",
      "tail",
    ]);

    assert_eq!(widen(&lines, 5..6), 2..6);
  }

  #[test]
  fn test_widen_near_buffer_edges() {
    let lines = buffer(&["Copyright", "HEADER", "Copyright"]);
    assert_eq!(widen(&lines, 1..2), 0..3);

    let lines = buffer(&["HEADER"]);
    assert_eq!(widen(&lines, 0..1), 0..1);
  }

  #[test]
  fn test_blank_lines_are_absorbed_on_both_sides() {
    let lines = buffer(&["code", "", "  ", "HEADER", "", "\t", "", "more"]);

    assert_eq!(widen(&lines, 3..4), 1..7);
  }

  #[test]
  fn test_blank_lines_absorbed_after_copyright_widening() {
    let lines = buffer(&["", "", "Copyright 2000", "HEADER", "Copyright 2001", "", "", "code"]);

    assert_eq!(widen(&lines, 3..4), 0..7);
  }
}
