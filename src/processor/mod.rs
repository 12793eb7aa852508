//! # Processor Module
//!
//! This module walks a project tree and patches the header of every file a
//! rule applies to.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - Reading text files and replacing them atomically
//! - [`content_transformer`] - Swapping headers inside a line buffer
//! - [`file_collector`] - Deterministic directory traversal and path mapping
//!
//! The [`Processor`] struct is the main entry point, orchestrating the
//! submodules. Files are processed one at a time in sorted order, and the
//! header variant matched in one file is tried first on the next.

mod content_transformer;
mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use content_transformer::{ContentTransformer, HeaderOutcome, Transformed, join_lines, split_lines};
pub use file_collector::{FileCollector, absolutize_path, resolve_root};
pub use file_io::FileIO;
use tracing::{debug, trace};

use crate::config::DEFAULT_CONFIG_FILENAME;
use crate::diff::DiffManager;
use crate::headers::VariantId;
use crate::ignore::{IGNORE_FILENAME, IgnoreManager};
use crate::output::{print_cannot_be_patched, print_header_not_found, print_patched, print_unchanged};
use crate::report::{FileAction, FileReport};
use crate::rules::RuleSet;

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub rules: RuleSet,
  pub root: PathBuf,

  /// Report changes without writing files
  pub check_only: bool,

  /// Ignore globs in addition to the configured ones
  pub ignore_patterns: Vec<String>,
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     check_only: true,
  ///     ..ProcessorConfig::new(rules, root)
  /// }
  /// ```
  pub const fn new(rules: RuleSet, root: PathBuf) -> Self {
    Self {
      rules,
      root,
      check_only: false,
      ignore_patterns: Vec::new(),
      diff_manager: None,
    }
  }
}

/// Processor for patching headers across a project.
pub struct Processor {
  /// Loaded rules, read-only for the whole run
  rules: RuleSet,

  /// Matcher for configured, command line and `.relicenseignore` patterns
  ignore_manager: IgnoreManager,

  /// Traversal and relative path mapping
  collector: FileCollector,

  /// Whether to only report changes without modifying files
  check_only: bool,

  /// Manager for rendering diffs
  diff_manager: DiffManager,
}

impl Processor {
  /// Creates a processor.
  ///
  /// # Errors
  ///
  /// Returns an error if an ignore pattern is invalid or `.relicenseignore`
  /// cannot be read.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let mut patterns = config.rules.ignore.clone();
    patterns.extend(config.ignore_patterns);

    let mut ignore_manager = IgnoreManager::new(&patterns)?;
    ignore_manager.load_ignore_file(&config.root)?;

    Ok(Self {
      rules: config.rules,
      ignore_manager,
      collector: FileCollector::new(config.root),
      check_only: config.check_only,
      diff_manager: config.diff_manager.unwrap_or_else(|| DiffManager::new(false)),
    })
  }

  pub fn root(&self) -> &Path {
    self.collector.root()
  }

  /// Lists the files below `target` in processing order.
  pub fn collect_files(&self, target: &Path) -> Result<Vec<PathBuf>> {
    self.collector.collect(target)
  }

  /// Processes every file below `target`.
  ///
  /// # Returns
  ///
  /// One report per file that an ignore pattern or a file rule applied to.
  ///
  /// # Errors
  ///
  /// Stops at the first file that cannot be read or written.
  pub fn process(&self, target: &Path) -> Result<Vec<FileReport>> {
    let files = self.collect_files(target)?;
    self.process_collected(&files)
  }

  /// Processes already collected files, in the given order.
  pub fn process_collected(&self, files: &[PathBuf]) -> Result<Vec<FileReport>> {
    let mut reports = Vec::with_capacity(files.len());
    let mut last_matched = None;

    for path in files {
      let (report, hint) = self.process_file(path, last_matched)?;
      last_matched = hint;
      reports.extend(report);
    }

    Ok(reports)
  }

  /// Processes a single file.
  ///
  /// # Parameters
  ///
  /// * `path` - Path of the file
  /// * `last_matched` - Header variant to try first
  ///
  /// # Returns
  ///
  /// The file's report, if any rule applied, and the hint for the next file.
  pub fn process_file(
    &self,
    path: &Path,
    last_matched: Option<VariantId>,
  ) -> Result<(Option<FileReport>, Option<VariantId>)> {
    let rel_path = self.collector.relative_path(path);
    let rel = rel_path.to_string_lossy();

    if is_project_file(&rel_path) {
      trace!("Skipping: {} (relicense's own file)", rel);
      return Ok((None, last_matched));
    }

    if self.ignore_manager.is_ignored(&rel_path) {
      return Ok((Some(FileReport::ignored(rel_path)), last_matched));
    }

    let Some(rule) = self.rules.select(&rel) else {
      trace!("Skipping: {} (no file rule)", rel);
      return Ok((None, last_matched));
    };

    let Some(style) = self.rules.style_for(rule, &rel) else {
      print_cannot_be_patched(&rel_path);
      return Ok((Some(FileReport::unpatchable(rel_path)), last_matched));
    };

    let content = FileIO::read_text(path)?;

    debug!("Patching {} with rule '{}' ({})", rel, rule.glob(), style);

    let transformer = ContentTransformer::new(&self.rules.registry);
    let transformed = transformer.transform(split_lines(&content), rule, style, last_matched);

    if transformed.outcome == HeaderOutcome::NotFound {
      print_header_not_found(&rel_path);
    }

    let new_content = join_lines(&transformed.lines);
    let action = if new_content == content {
      print_unchanged(&rel_path);
      FileAction::Unchanged
    } else {
      self.diff_manager.display_diff(&rel_path, &content, &new_content);
      if !self.check_only {
        FileIO::write_atomic(path, &new_content)?;
      }
      print_patched(&rel_path, self.check_only);
      FileAction::Patched
    };

    let report = FileReport::new(rel_path, action, transformed.outcome.found());
    Ok((Some(report), transformed.last_matched))
  }
}

/// Whether `rel_path` is the config or ignore file at the project root.
fn is_project_file(rel_path: &Path) -> bool {
  rel_path == Path::new(DEFAULT_CONFIG_FILENAME) || rel_path == Path::new(IGNORE_FILENAME)
}
