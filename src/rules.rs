//! # Rules Module
//!
//! The resolved, read-only rule set a run works from: which header goes into
//! which files, which comment style each file uses, which headers may already
//! be present, and which paths are left alone.

use glob::Pattern;

use crate::formats::{CommentStyle, FormatTable};
use crate::headers::HeaderRegistry;

/// A file glob bound to the header it should carry.
#[derive(Debug, Clone)]
pub struct FileRule {
  pattern: Pattern,
  header: Option<Vec<String>>,
  rstrip: bool,
}

impl FileRule {
  /// Creates a rule.
  ///
  /// # Parameters
  ///
  /// * `pattern` - Glob matched against paths relative to the project root
  /// * `header` - Plain header lines to install, or `None` to leave headers
  ///   alone and only normalise the file
  /// * `rstrip` - Whether to trim trailing whitespace from every line
  pub const fn new(pattern: Pattern, header: Option<Vec<String>>, rstrip: bool) -> Self {
    Self { pattern, header, rstrip }
  }

  pub fn glob(&self) -> &str {
    self.pattern.as_str()
  }

  pub fn header(&self) -> Option<&[String]> {
    self.header.as_deref()
  }

  pub const fn rstrip(&self) -> bool {
    self.rstrip
  }

  pub fn matches(&self, rel_path: &str) -> bool {
    self.pattern.matches(rel_path)
  }
}

/// Everything loaded from configuration that drives a run.
#[derive(Debug, Clone)]
pub struct RuleSet {
  /// Every header variant that may be found in a file.
  pub registry: HeaderRegistry,

  /// File rules in configuration order.
  pub files: Vec<FileRule>,

  /// Comment styles by file glob.
  pub formats: FormatTable,

  /// Globs of paths excluded from processing.
  pub ignore: Vec<String>,
}

impl RuleSet {
  /// Returns the first file rule whose glob matches `rel_path`.
  pub fn select(&self, rel_path: &str) -> Option<&FileRule> {
    self.files.iter().find(|rule| rule.matches(rel_path))
  }

  /// Returns the comment style for a file selected by `rule`.
  pub fn style_for(&self, rule: &FileRule, rel_path: &str) -> Option<&CommentStyle> {
    self.formats.lookup(rule.glob(), rel_path)
  }
}
