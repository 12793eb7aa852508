//! # Report Module
//!
//! Per-file outcomes of a run and the summary built from them.

use std::path::PathBuf;
use std::time::Duration;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
  /// The file's content changed (or would change in check mode).
  Patched,
  /// The file already had the expected content.
  Unchanged,
  /// A file rule matched but no comment style is known for the file.
  Unpatchable,
  /// The file matched an ignore pattern.
  Ignored,
}

/// Outcome of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  /// Path relative to the project root.
  pub path: PathBuf,

  pub action: FileAction,

  /// Whether an existing header was found and removed. `None` when no header
  /// was looked for.
  pub header_found: Option<bool>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, action: FileAction, header_found: Option<bool>) -> Self {
    Self {
      path: path.into(),
      action,
      header_found,
    }
  }

  pub const fn ignored(path: PathBuf) -> Self {
    Self {
      path,
      action: FileAction::Ignored,
      header_found: None,
    }
  }

  pub const fn unpatchable(path: PathBuf) -> Self {
    Self {
      path,
      action: FileAction::Unpatchable,
      header_found: None,
    }
  }
}

/// Counts over every file report of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
  /// Files that produced a report: those a rule applied to, plus ignored ones.
  pub total_files: usize,
  pub patched: usize,
  pub unchanged: usize,
  pub unpatchable: usize,
  pub ignored: usize,

  /// Files that received a header without an old one being found.
  pub header_not_found: usize,

  pub processing_time: Duration,
}

impl ProcessingSummary {
  /// Builds a summary from file reports.
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      total_files: files.len(),
      processing_time,
      ..Self::default()
    };

    for file in files {
      match file.action {
        FileAction::Patched => summary.patched += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::Unpatchable => summary.unpatchable += 1,
        FileAction::Ignored => summary.ignored += 1,
      }
      if file.header_found == Some(false) {
        summary.header_not_found += 1;
      }
    }

    summary
  }

  /// Whether the run left something to fix: in check mode, files that would
  /// change.
  pub const fn has_changes(&self) -> bool {
    self.patched > 0
  }
}
