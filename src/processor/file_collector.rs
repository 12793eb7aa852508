//! # File Collector Module
//!
//! This module enumerates the files of a run in a deterministic order and
//! maps them to paths relative to the project root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::DEFAULT_CONFIG_FILENAME;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// File collector for directory traversal.
pub struct FileCollector {
  /// Root of the project; relative paths are computed against it.
  root: PathBuf,
}

impl FileCollector {
  /// Creates a new FileCollector for the given project root.
  pub const fn new(root: PathBuf) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Collects the files below `target`, sorted by path.
  ///
  /// `target` may be a single file, which is returned as is. Version control
  /// directories are skipped.
  ///
  /// # Errors
  ///
  /// Returns an error if `target` does not exist or a directory cannot be
  /// read.
  pub fn collect(&self, target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
      return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
      anyhow::bail!("Path not found: {}", target.display());
    }

    debug!("Scanning directory: {}", target.display());
    let start_time = std::time::Instant::now();

    let mut files = Vec::new();
    let walker = WalkDir::new(target)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| !(e.file_type().is_dir() && SKIPPED_DIRS.iter().any(|d| e.file_name() == *d)));

    for entry in walker {
      let entry = entry.with_context(|| format!("Failed to walk {}", target.display()))?;
      if entry.file_type().is_file() {
        files.push(entry.into_path());
      }
    }

    debug!(
      "Found {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files)
  }

  /// Returns `path` relative to the project root, with `/` separators.
  ///
  /// Rule and ignore globs are matched against this form.
  pub fn relative_path(&self, path: &Path) -> PathBuf {
    let rel = path
      .strip_prefix(&self.root)
      .map(Path::to_path_buf)
      .ok()
      .or_else(|| pathdiff::diff_paths(path, &self.root))
      .unwrap_or_else(|| path.to_path_buf());

    PathBuf::from(rel.to_string_lossy().replace('\\', "/"))
  }
}

/// Finds the project root for a target path.
///
/// A directory target is its own root. For a file target, the nearest
/// ancestor holding a config file is used, falling back to the file's
/// directory.
pub fn resolve_root(target: &Path) -> Result<PathBuf> {
  let target = absolutize_path(target)?;

  if target.is_dir() {
    return Ok(target);
  }

  let parent = target
    .parent()
    .with_context(|| format!("No parent directory for {}", target.display()))?;

  let root = parent
    .ancestors()
    .find(|dir| dir.join(DEFAULT_CONFIG_FILENAME).is_file())
    .unwrap_or(parent);

  Ok(root.to_path_buf())
}

/// Converts a potentially relative path to an absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}
