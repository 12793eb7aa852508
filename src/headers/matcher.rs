//! # Block Matcher
//!
//! Finds where a known header sits inside a file by comparing it line by line
//! against every window of the same length. Lines are compared with a
//! character-level similarity ratio, so a header whose year or wording drifted
//! slightly is still recognised.

use std::ops::Range;

use similar::{DiffTag, TextDiff};
use tracing::trace;

/// Minimum average line similarity a window must strictly exceed to count as a
/// match.
pub const THRESHOLD: f64 = 0.9;

/// Scores within this distance of [`THRESHOLD`] are treated as equal to it.
const SCORE_EPSILON: f64 = 1e-9;

/// Half-open range of line indices `[start, end)` into a file's lines.
pub type MatchRange = Range<usize>;

/// Similarity of two strings in `0.0..=1.0`.
///
/// This is twice the number of characters in the longest common subsequence
/// divided by the total number of characters, so it is symmetric and `1.0`
/// exactly when both strings are equal (including both empty).
pub fn similarity(a: &str, b: &str) -> f64 {
  let total = a.chars().count() + b.chars().count();
  if total == 0 {
    return 1.0;
  }

  let matched: usize = TextDiff::from_chars(a, b)
    .ops()
    .iter()
    .filter(|op| op.tag() == DiffTag::Equal)
    .map(|op| op.old_range().len())
    .sum();

  (2 * matched) as f64 / total as f64
}

/// Locates `header` inside `lines`.
///
/// Every start offset in `[0, lines.len() - header.len()]` is scored by the
/// average [`similarity`] of the aligned lines. The first (lowest) offset whose
/// score is strictly greater than [`THRESHOLD`] wins.
///
/// Returns `None` if `lines` is shorter than `header`, if `header` is empty, or
/// if no window qualifies.
pub fn find_block<H, L>(header: &[H], lines: &[L]) -> Option<MatchRange>
where
  H: AsRef<str>,
  L: AsRef<str>,
{
  let height = header.len();
  if height == 0 || lines.len() < height {
    return None;
  }

  (0..=lines.len() - height).find_map(|start| {
    let total: f64 = header
      .iter()
      .zip(&lines[start..start + height])
      .map(|(expected, actual)| similarity(actual.as_ref(), expected.as_ref()))
      .sum();
    let score = total / height as f64;

    if score > THRESHOLD + SCORE_EPSILON {
      trace!("Header matched at line {} with score {:.3}", start, score);
      Some(start..start + height)
    } else {
      None
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_similarity_bounds() {
    assert_eq!(similarity("Copyright 2020 A", "Copyright 2020 A"), 1.0);
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", ""), 0.0);
    assert!(similarity("Copyright 2019 A", "fn main() {}") < THRESHOLD);
  }

  #[test]
  fn test_similarity_is_symmetric() {
    let a = "# Copyright 2018 A";
    let b = "# Copyright 2019 B";
    assert_eq!(similarity(a, b), similarity(b, a));
  }

  #[test]
  fn test_year_change_scores_above_threshold() {
    assert!(similarity("# Copyright 2018 Jane Doe", "# Copyright 2019 Jane Doe") > THRESHOLD);
  }

  #[test]
  fn test_find_block_lowest_offset_wins() {
    let header = ["// one", "// two"];
    let lines = ["// one", "// two", "// one", "// two", "code"];

    assert_eq!(find_block(&header, &lines), Some(0..2));
  }

  #[test]
  fn test_find_block_in_the_middle() {
    let header = ["# Copyright 2019 A", "# MPL 2.0"];
    let lines = ["#!/usr/bin/env python", "# Copyright 2018 A", "# MPL 2.0", "", "print(1)"];

    assert_eq!(find_block(&header, &lines), Some(1..3));
  }

  #[test]
  fn test_find_block_shorter_file() {
    let header = ["one", "two", "three"];
    let lines = ["one", "two"];

    assert_eq!(find_block(&header, &lines), None);
  }

  #[test]
  fn test_find_block_empty_header() {
    let header: [&str; 0] = [];
    assert_eq!(find_block(&header, &["code"]), None);
  }

  #[test]
  fn test_find_block_checks_final_window() {
    let header = ["one", "two"];

    assert_eq!(find_block(&header, &["one", "two"]), Some(0..2));
    assert_eq!(find_block(&header, &["code", "one", "two"]), Some(1..3));
  }

  #[test]
  fn test_threshold_boundary_exactly_at_threshold() {
    // 9 of 10 characters shared: 2 * 9 / 20 == 0.9
    let header = ["abcdefghij"];
    let lines = ["abcdefghiX", "code"];

    assert_eq!(similarity(lines[0], header[0]), THRESHOLD);
    assert_eq!(find_block(&header, &lines), None);
  }

  #[test]
  fn test_threshold_boundary_just_above() {
    // 19 of 20 characters shared: 2 * 19 / 40 == 0.95
    let header = ["abcdefghijklmnopqrst"];
    let lines = ["abcdefghijklmnopqrsX", "code"];

    assert!(similarity(lines[0], header[0]) > THRESHOLD);
    assert_eq!(find_block(&header, &lines), Some(0..1));
  }

  #[test]
  fn test_threshold_boundary_averaged_over_lines() {
    // 1.0 and 0.8 average exactly to 0.9, which must not match
    let header = ["abcde", "abcdefghij"];
    let lines = ["abcde", "abcdefghXY", "code"];

    assert_eq!(find_block(&header, &lines), None);

    // 1.0 and 0.9 average to 0.95
    let lines = ["abcde", "abcdefghiX", "code"];
    assert_eq!(find_block(&header, &lines), Some(0..2));
  }

  #[test]
  fn test_threshold_boundary_over_three_lines() {
    // 0.7, 1.0 and 1.0 average to exactly 0.9
    let header = ["abcdefghij", "same line one", "same line two"];
    let lines = ["abcdefgXYZ", "same line one", "same line two", "code"];

    assert_eq!(similarity(lines[0], header[0]), 0.7);
    assert_eq!(find_block(&header, &lines), None);
  }

  #[test]
  fn test_find_block_accepts_owned_lines() {
    let header = vec!["// MPL 2.0".to_string()];
    let lines = vec!["// MPL 2.0".to_string(), String::new()];

    assert_eq!(find_block(&header, &lines), Some(0..1));
  }
}
