//! # Formats Module
//!
//! This module knows how a header looks inside a particular kind of file.
//!
//! - [`Decoration`] turns plain header lines into comment lines
//! - [`CommentStyle`] is the closed set of supported styles; each one pairs the
//!   shared header remover with an inserter
//! - [`FormatTable`] maps file globs to styles, with configured entries taking
//!   precedence over the built-in ones
//!
//! ## Example
//!
//! ```rust
//! use relicense::formats::CommentStyle;
//!
//! let style = CommentStyle::shebang("# ", "#");
//! let mut lines = vec!["#!/bin/sh".to_string(), "echo hi".to_string()];
//!
//! style.insert(&mut lines, &["Copyright 2025 A".to_string()]);
//!
//! assert_eq!(lines, ["#!/bin/sh", "", "# Copyright 2025 A", "", "echo hi"]);
//! ```

use std::fmt;

use glob::Pattern;
use tracing::trace;

use crate::headers::{HeaderRegistry, Removal, VariantId, remove_header};

/// Comment decoration applied to plain header text.
///
/// # Fields
///
/// * `first` - Prefix for the first line. Falls back to `middle`.
/// * `middle` - Prefix for every other line
/// * `last` - Suffix closing the last line (e.g. " */"). When absent the last
///   line is decorated like an interior one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
  pub first: Option<String>,
  pub middle: String,
  pub last: Option<String>,
}

impl Decoration {
  /// A line-comment decoration: every line gets `prefix`.
  pub fn line(prefix: &str) -> Self {
    Self {
      first: None,
      middle: prefix.to_string(),
      last: None,
    }
  }

  /// A block-comment decoration with an opening prefix and a closing suffix.
  pub fn block(first: &str, middle: &str, last: &str) -> Self {
    Self {
      first: Some(first.to_string()),
      middle: middle.to_string(),
      last: Some(last.to_string()),
    }
  }

  /// Renders plain header lines as decorated comment lines.
  ///
  /// - the first line gets the first-line prefix (or the middle prefix)
  /// - interior lines get the middle prefix
  /// - the last line gets the closing suffix after its text, or the middle
  ///   prefix when there is no suffix
  ///
  /// A single-line header gets both the opening prefix and the closing suffix.
  /// Prefix and text are concatenated as is, so `"// "` renders an empty line
  /// as `"// "`.
  pub fn render<S: AsRef<str>>(&self, header: &[S]) -> Vec<String> {
    let last_index = header.len().saturating_sub(1);

    header
      .iter()
      .enumerate()
      .map(|(i, text)| {
        let text = text.as_ref();
        let mut line = if i == 0 {
          format!("{}{}", self.first.as_deref().unwrap_or(&self.middle), text)
        } else if i == last_index && self.last.is_some() {
          text.to_string()
        } else {
          format!("{}{}", self.middle, text)
        };

        if i == last_index
          && let Some(ref suffix) = self.last
        {
          line.push_str(suffix);
        }
        line
      })
      .collect()
  }
}

/// The supported comment styles.
///
/// Every style removes old headers the same way: registry variants are
/// rendered with the style's decoration and located with the fuzzy block
/// matcher. Styles differ in decoration and in where the new header goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentStyle {
  /// Line comments, header prepended to the file.
  Line(Decoration),

  /// Line comments in files that may open with interpreter or encoding
  /// directives. Leading lines starting with `marker` stay on top.
  Shebang { decoration: Decoration, marker: String },

  /// Block comments with an opening and a closing token, header prepended.
  Block(Decoration),
}

impl CommentStyle {
  pub fn line(prefix: &str) -> Self {
    Self::Line(Decoration::line(prefix))
  }

  pub fn shebang(prefix: &str, marker: &str) -> Self {
    Self::Shebang {
      decoration: Decoration::line(prefix),
      marker: marker.to_string(),
    }
  }

  pub fn block(first: &str, middle: &str, last: &str) -> Self {
    Self::Block(Decoration::block(first, middle, last))
  }

  pub const fn decoration(&self) -> &Decoration {
    match self {
      Self::Line(decoration) | Self::Block(decoration) | Self::Shebang { decoration, .. } => decoration,
    }
  }

  /// Renders plain header lines in this style.
  pub fn render<S: AsRef<str>>(&self, header: &[S]) -> Vec<String> {
    self.decoration().render(header)
  }

  /// Removes one existing header from `lines`. See [`remove_header`].
  pub fn remove(&self, lines: &mut Vec<String>, registry: &HeaderRegistry, last_matched: Option<VariantId>) -> Removal {
    remove_header(lines, registry, last_matched, |id| {
      registry.get(id).map(|variant| self.render(variant.lines()))
    })
  }

  /// Like [`remove`](Self::remove), for buffers whose lines were stripped of
  /// trailing whitespace. Variants are stripped the same way after rendering.
  pub fn remove_stripped(
    &self,
    lines: &mut Vec<String>,
    registry: &HeaderRegistry,
    last_matched: Option<VariantId>,
  ) -> Removal {
    remove_header(lines, registry, last_matched, |id| {
      registry.get(id).map(|variant| {
        self
          .render(variant.lines())
          .into_iter()
          .map(|line| line.trim_end().to_string())
          .collect()
      })
    })
  }

  /// Renders `header` in this style and inserts it into `lines`.
  pub fn insert<S: AsRef<str>>(&self, lines: &mut Vec<String>, header: &[S]) {
    let rendered = self.render(header);
    match self {
      Self::Line(_) | Self::Block(_) => insert_plain(lines, rendered),
      Self::Shebang { marker, .. } => insert_after_directives(lines, rendered, marker),
    }
  }
}

impl fmt::Display for CommentStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Line(d) => write!(f, "line '{}'", d.middle),
      Self::Shebang { decoration, marker } => write!(f, "shebang '{}' after '{}'", decoration.middle, marker),
      Self::Block(d) => write!(
        f,
        "block '{}'...'{}'",
        d.first.as_deref().unwrap_or(&d.middle),
        d.last.as_deref().unwrap_or_default()
      ),
    }
  }
}

/// Puts `header` on top of the file followed by one blank line.
pub fn insert_plain(lines: &mut Vec<String>, mut header: Vec<String>) {
  header.push(String::new());
  lines.splice(0..0, header);
}

/// Puts `header` after the leading block of lines starting with `marker`.
///
/// A non-empty preserved block is separated from the header by one blank
/// line. If a non-blank line follows the insertion point, one blank line is
/// added after the header.
pub fn insert_after_directives(lines: &mut Vec<String>, mut header: Vec<String>, marker: &str) {
  let index = lines.iter().take_while(|line| line.starts_with(marker)).count();
  trace!("Keeping {} directive line(s) above the header", index);

  if index > 0 {
    header.insert(0, String::new());
  }
  if lines.get(index).is_some_and(|line| !line.trim().is_empty()) {
    header.push(String::new());
  }

  lines.splice(index..index, header);
}

/// A file glob bound to a comment style.
#[derive(Debug, Clone)]
pub struct FormatRule {
  pattern: Pattern,
  style: CommentStyle,
}

impl FormatRule {
  pub const fn new(pattern: Pattern, style: CommentStyle) -> Self {
    Self { pattern, style }
  }

  pub fn glob(&self) -> &str {
    self.pattern.as_str()
  }

  pub const fn style(&self) -> &CommentStyle {
    &self.style
  }

  fn matches(&self, rel_path: &str) -> bool {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    self.pattern.matches(rel_path) || self.pattern.matches(file_name)
  }
}

/// Lookup table from file globs to comment styles.
#[derive(Debug, Clone)]
pub struct FormatTable {
  rules: Vec<FormatRule>,
}

impl Default for FormatTable {
  fn default() -> Self {
    Self::builtin()
  }
}

impl FormatTable {
  /// The built-in styles.
  pub fn builtin() -> Self {
    let slashes = CommentStyle::line("// ");
    let hashes = CommentStyle::shebang("# ", "#");
    let dashes = CommentStyle::line("-- ");
    let semicolons = CommentStyle::line(";; ");
    let percents = CommentStyle::line("% ");
    let c_block = CommentStyle::block("/* ", "   ", " */");
    let markup = CommentStyle::block("<!-- ", "     ", " -->");

    let table: &[(&[&str], &CommentStyle)] = &[
      (
        &[
          "*.rs", "*.c", "*.h", "*.cc", "*.cpp", "*.hh", "*.hpp", "*.cs", "*.go", "*.java", "*.js", "*.mjs", "*.cjs",
          "*.jsx", "*.ts", "*.tsx", "*.kt", "*.kts", "*.scala", "*.swift", "*.dart", "*.proto", "*.groovy",
        ],
        &slashes,
      ),
      (
        &[
          "*.py", "*.sh", "*.bash", "*.zsh", "*.rb", "*.pl", "*.yaml", "*.yml", "*.toml", "*.tf", "*.cmake", "*.mk",
          "CMakeLists.txt", "Dockerfile", "Makefile",
        ],
        &hashes,
      ),
      (&["*.sql", "*.hs", "*.lua"], &dashes),
      (&["*.el", "*.lisp"], &semicolons),
      (&["*.erl", "*.tex"], &percents),
      (&["*.css", "*.scss"], &c_block),
      (&["*.html", "*.xml", "*.vue", "*.svg"], &markup),
    ];

    let rules = table
      .iter()
      .flat_map(|(globs, style)| {
        globs.iter().filter_map(move |glob| {
          Pattern::new(glob)
            .ok()
            .map(|pattern| FormatRule::new(pattern, (*style).clone()))
        })
      })
      .collect();

    Self { rules }
  }

  /// Creates a table where `configured` rules are consulted before the
  /// built-in ones.
  pub fn with_overrides(configured: Vec<FormatRule>) -> Self {
    let mut rules = configured;
    rules.extend(Self::builtin().rules);
    Self { rules }
  }

  /// Finds the style for a file selected by the file rule `rule_glob`.
  ///
  /// A format registered under exactly the same glob wins. Otherwise the first
  /// format whose glob matches the relative path (or its file name) is used.
  pub fn lookup(&self, rule_glob: &str, rel_path: &str) -> Option<&CommentStyle> {
    self
      .rules
      .iter()
      .find(|rule| rule.glob() == rule_glob)
      .or_else(|| self.rules.iter().find(|rule| rule.matches(rel_path)))
      .map(FormatRule::style)
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}
