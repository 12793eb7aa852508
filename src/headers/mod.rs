//! # Headers Module
//!
//! This module owns the set of known header texts and the algorithms that find
//! and remove them from a file:
//!
//! - [`HeaderRegistry`] keeps every known header variant (built-in, historical
//!   and currently configured) in registration order
//! - [`matcher`] locates a variant inside a file's lines with fuzzy, per-line
//!   similarity
//! - [`remover`] widens a located block over nearby copyright and blank lines
//!   and deletes it
//!
//! ## Example
//!
//! ```rust
//! use relicense::headers::HeaderRegistry;
//!
//! let mut registry = HeaderRegistry::new();
//! let id = registry.register("notice", "Copyright 2019 A\nMPL 2.0");
//!
//! assert_eq!(registry.get(id).map(|v| v.lines().len()), Some(2));
//! ```

pub mod matcher;
pub mod remover;

use std::fmt;

use tracing::{debug, trace};

pub use matcher::{MatchRange, THRESHOLD, find_block, similarity};
pub use remover::{COPYRIGHT_DELTA, Removal, remove_header};

/// Identifier of a variant inside a [`HeaderRegistry`].
///
/// Identifiers are positions in registration order, so they stay valid for the
/// lifetime of the registry they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantId(usize);

impl VariantId {
  /// Position of the variant in registration order.
  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for VariantId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// One historical or current rendition of a header's plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderVariant {
  name: String,
  lines: Vec<String>,
}

impl HeaderVariant {
  /// Creates a variant from already split lines.
  pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
    Self {
      name: name.into(),
      lines,
    }
  }

  /// Creates a variant from a block of text.
  ///
  /// The text is dedented and trimmed before it is split into lines, so
  /// indented multi-line strings from configuration files keep their relative
  /// layout.
  pub fn from_text(name: impl Into<String>, text: &str) -> Self {
    let lines = dedent(text).trim().split('\n').map(str::to_string).collect();
    Self::new(name, lines)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  /// The variant's lines joined back into a single block of text.
  pub fn text(&self) -> String {
    self.lines.join("\n")
  }
}

/// Built-in header texts available to every configuration by name.
pub const BUILTIN_HEADERS: &[(&str, &str)] = &[
  (
    "MPL-2.0",
    "This Source Code Form is subject to the terms of the
    Mozilla Public License, v. 2.0. If a copy of the MPL was not distributed
    with this file, You can obtain one at http://mozilla.org/MPL/2.0/.",
  ),
  (
    "Apache-2.0",
    "Licensed under the Apache License, Version 2.0 (the \"License\");
    you may not use this file except in compliance with the License.
    You may obtain a copy of the License at

        http://www.apache.org/licenses/LICENSE-2.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an \"AS IS\" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.",
  ),
  (
    "MIT",
    "Permission is hereby granted, free of charge, to any person obtaining a copy
    of this software and associated documentation files (the \"Software\"), to deal
    in the Software without restriction, including without limitation the rights
    to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
    copies of the Software, and to permit persons to whom the Software is
    furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.",
  ),
];

/// Registry of every header variant that may be found in a file.
///
/// Variants are kept in registration order; the remover tries them in that
/// order. Registering the same lines twice returns the existing identifier.
#[derive(Debug, Clone, Default)]
pub struct HeaderRegistry {
  variants: Vec<HeaderVariant>,
}

impl HeaderRegistry {
  /// Creates an empty registry.
  pub const fn new() -> Self {
    Self { variants: Vec::new() }
  }

  /// Creates a registry pre-populated with [`BUILTIN_HEADERS`].
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    for (name, text) in BUILTIN_HEADERS {
      registry.register(*name, text);
    }
    registry
  }

  /// Registers a header from a block of text. See [`HeaderVariant::from_text`].
  pub fn register(&mut self, name: impl Into<String>, text: &str) -> VariantId {
    self.insert(HeaderVariant::from_text(name, text))
  }

  /// Registers an already split header.
  pub fn register_lines(&mut self, name: impl Into<String>, lines: Vec<String>) -> VariantId {
    self.insert(HeaderVariant::new(name, lines))
  }

  fn insert(&mut self, variant: HeaderVariant) -> VariantId {
    if let Some(index) = self.variants.iter().position(|v| v.lines == variant.lines) {
      trace!("Header '{}' duplicates '{}'", variant.name, self.variants[index].name);
      return VariantId(index);
    }

    debug!("Registered header '{}' ({} lines)", variant.name, variant.lines.len());
    self.variants.push(variant);
    VariantId(self.variants.len() - 1)
  }

  pub fn get(&self, id: VariantId) -> Option<&HeaderVariant> {
    self.variants.get(id.0)
  }

  /// Looks a variant up by the name it was first registered under.
  pub fn find(&self, name: &str) -> Option<&HeaderVariant> {
    self.variants.iter().find(|v| v.name == name)
  }

  /// Iterates variants with their identifiers, in registration order.
  pub fn iter(&self) -> impl Iterator<Item = (VariantId, &HeaderVariant)> {
    self.variants.iter().enumerate().map(|(i, v)| (VariantId(i), v))
  }

  pub fn len(&self) -> usize {
    self.variants.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variants.is_empty()
  }
}

/// Removes the whitespace prefix shared by every non-blank line.
fn dedent(text: &str) -> String {
  let margin = text
    .lines()
    .filter(|line| !line.trim().is_empty())
    .skip(1)
    .map(indent_of)
    .min();

  // The first line of a string literal usually starts right after the quote,
  // so it never carries the margin. A first line that is itself indented
  // still counts.
  let first_margin = text
    .lines()
    .find(|line| !line.trim().is_empty())
    .map(indent_of);

  let margin = match (first_margin, margin) {
    (Some(0), Some(rest)) => rest,
    (Some(first), Some(rest)) => first.min(rest),
    (Some(first), None) => first,
    (None, _) => 0,
  };

  text
    .lines()
    .map(|line| {
      if line.trim().is_empty() {
        ""
      } else {
        &line[margin.min(indent_of(line))..]
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn indent_of(line: &str) -> usize {
  line.len() - line.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_register_splits_and_trims() {
    let mut registry = HeaderRegistry::new();
    let id = registry.register("notice", "\n  Copyright 2019 A\n  MPL 2.0\n");

    let variant = registry.get(id).expect("variant should exist");
    assert_eq!(variant.lines(), ["Copyright 2019 A", "MPL 2.0"]);
    assert_eq!(variant.name(), "notice");
  }

  #[test]
  fn test_register_deduplicates_identical_lines() {
    let mut registry = HeaderRegistry::new();
    let first = registry.register("a", "one\ntwo");
    let second = registry.register_lines("b", vec!["one".to_string(), "two".to_string()]);

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    assert!(registry.find("b").is_none());
  }

  #[test]
  fn test_builtins_keep_relative_indentation() {
    let registry = HeaderRegistry::with_builtins();
    let apache = registry.find("Apache-2.0").expect("apache header should exist");

    assert_eq!(apache.lines()[0], "Licensed under the Apache License, Version 2.0 (the \"License\");");
    assert!(apache.lines().contains(&"    http://www.apache.org/licenses/LICENSE-2.0".to_string()));
    assert!(apache.lines().contains(&String::new()));
  }

  #[test]
  fn test_iter_preserves_registration_order() {
    let mut registry = HeaderRegistry::new();
    registry.register("first", "1");
    registry.register("second", "2");

    let names: Vec<_> = registry.iter().map(|(_, v)| v.name().to_string()).collect();
    assert_eq!(names, ["first", "second"]);
  }

  #[test]
  fn test_dedent() {
    assert_eq!(dedent("a\n    b\n      c"), "a\nb\n  c");
    assert_eq!(dedent("  a\n  b"), "a\nb");
    assert_eq!(dedent("a\n\n  b"), "a\n\nb");
  }
}
