//! # Ignore Module
//!
//! Decides which files are left alone. A file is skipped when its path,
//! relative to the project root, matches:
//!
//! - an `ignore` glob from the configuration file
//! - an `--ignore` glob from the command line
//! - a pattern in the `.relicenseignore` file at the project root
//!   (gitignore syntax)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::verbose_log;

/// Name of the gitignore-style file read from the project root.
pub const IGNORE_FILENAME: &str = ".relicenseignore";

/// Matcher for every source of ignore patterns.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use relicense::ignore::IgnoreManager;
///
/// # fn main() -> anyhow::Result<()> {
/// let manager = IgnoreManager::new(&["target/".to_string(), "*.min.js".to_string()])?;
///
/// assert!(manager.is_ignored(Path::new("target/debug/build.rs")));
/// assert!(manager.is_ignored(Path::new("web/app.min.js")));
/// assert!(!manager.is_ignored(Path::new("src/main.rs")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IgnoreManager {
  /// Compiled config and command line globs.
  glob_set: GlobSet,

  /// Matcher for `.relicenseignore`, if one was loaded.
  gitignore: Option<Gitignore>,
}

impl IgnoreManager {
  /// Compiles glob patterns.
  ///
  /// Patterns ending in `/` and plain names without wildcards also match
  /// everything below a directory of that name.
  ///
  /// # Errors
  ///
  /// Returns an error if any pattern is not a valid glob.
  pub fn new(patterns: &[String]) -> Result<Self> {
    let mut builder = GlobSetBuilder::new();

    let add_pattern = |b: &mut GlobSetBuilder, p: &str| -> Result<()> {
      b.add(Glob::new(p).with_context(|| format!("Invalid glob pattern: {}", p))?);
      Ok(())
    };

    for pattern in patterns {
      let pattern = pattern.replace('\\', "/");

      if let Some(dir_pattern) = pattern.strip_suffix('/') {
        add_pattern(&mut builder, dir_pattern)?;
        add_pattern(&mut builder, &format!("{}/**", dir_pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", dir_pattern))?;
      } else if !pattern.contains(['*', '?', '[']) {
        add_pattern(&mut builder, &pattern)?;
        add_pattern(&mut builder, &format!("**/{}", pattern))?;
        add_pattern(&mut builder, &format!("{}/**", pattern))?;
        add_pattern(&mut builder, &format!("**/{}/**", pattern))?;
      } else {
        add_pattern(&mut builder, &pattern)?;
      }
    }

    let glob_set = builder.build().with_context(|| "Failed to build glob set")?;

    Ok(Self {
      glob_set,
      gitignore: None,
    })
  }

  /// Loads `.relicenseignore` from `root` if it exists.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists but cannot be read or parsed.
  pub fn load_ignore_file(&mut self, root: &Path) -> Result<()> {
    let ignore_path = root.join(IGNORE_FILENAME);
    if !ignore_path.is_file() {
      return Ok(());
    }

    verbose_log!("Loading ignore file: {}", ignore_path.display());
    let content =
      fs::read_to_string(&ignore_path).with_context(|| format!("Failed to read {}", ignore_path.display()))?;

    let mut builder = GitignoreBuilder::new(root);
    for line in content.lines() {
      let line = line.trim();
      if !line.is_empty() && !line.starts_with('#') {
        builder
          .add_line(Some(PathBuf::from(root)), line)
          .with_context(|| format!("Invalid pattern '{}' in {}", line, ignore_path.display()))?;
      }
    }

    self.gitignore = Some(
      builder
        .build()
        .with_context(|| format!("Failed to build matcher for {}", ignore_path.display()))?,
    );
    Ok(())
  }

  /// Checks whether a path relative to the project root is excluded.
  pub fn is_ignored(&self, rel_path: &Path) -> bool {
    if self.glob_set.is_match(rel_path) {
      verbose_log!("Skipping: {} (matches ignore pattern)", rel_path.display());
      return true;
    }

    if let Some(ref gitignore) = self.gitignore
      && gitignore.matched_path_or_any_parents(rel_path, false).is_ignore()
    {
      verbose_log!("Skipping: {} (matches {})", rel_path.display(), IGNORE_FILENAME);
      return true;
    }

    false
  }
}
