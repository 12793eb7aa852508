//! # File I/O Module
//!
//! Reading source files as text and replacing them atomically.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::trace;

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads a file as UTF-8 text.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid UTF-8.
  pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    trace!("Read {} bytes from {}", bytes.len(), path.display());

    String::from_utf8(bytes).with_context(|| format!("File is not valid UTF-8: {}", path.display()))
  }

  /// Replaces the content of `path` atomically.
  ///
  /// The content goes to a temporary file in the same directory, which is then
  /// renamed over `path`. The original file's permissions are carried over, so
  /// executable scripts stay executable. If anything fails the original file
  /// is left as it was.
  pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));

    let permissions = std::fs::metadata(path).map(|m| m.permissions()).ok();

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
      .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

    tmp
      .write_all(content.as_bytes())
      .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    tmp
      .flush()
      .with_context(|| format!("Failed to flush temp file for {}", path.display()))?;

    if let Some(permissions) = permissions {
      tmp
        .as_file()
        .set_permissions(permissions)
        .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    tmp
      .persist(path)
      .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
  }
}
