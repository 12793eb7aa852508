#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relicense::config::{DEFAULT_CONFIG_FILENAME, load_rules};
use relicense::processor::{Processor, ProcessorConfig};
use relicense::report::FileReport;
use relicense::rules::RuleSet;
use tempfile::TempDir;

/// Year used by every test that renders a header.
pub const TEST_YEAR: &str = "2020";

/// Python file with an interpreter line and a slightly outdated header.
pub const OUTDATED_SCRIPT: &str = "#!/usr/bin/env python\n# Copyright 2018 A\n# MPL 2.0\n\nprint(1)\n";

/// `OUTDATED_SCRIPT` after patching with [`SCENARIO_CONFIG`].
pub const PATCHED_SCRIPT: &str = "#!/usr/bin/env python\n\n# Copyright 2020 A\n# MPL 2.0\n\nprint(1)\n";

/// Config with one historical header and a rule for Python files.
pub const SCENARIO_CONFIG: &str = r#"
[headers]
old = """
Copyright 2019 A
MPL 2.0
"""

[files."*.py"]
header = "Copyright {year} A\nMPL 2.0"
"#;

/// A temporary project tree.
pub struct TestProject {
  dir: TempDir,
}

impl TestProject {
  pub fn new() -> Result<Self> {
    Ok(Self {
      dir: TempDir::new().context("Failed to create temp dir")?,
    })
  }

  /// Creates a project with `.relicense.toml` set to `config`.
  pub fn with_config(config: &str) -> Result<Self> {
    let project = Self::new()?;
    project.write(DEFAULT_CONFIG_FILENAME, config)?;
    Ok(project)
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn join(&self, rel: &str) -> PathBuf {
    self.dir.path().join(rel)
  }

  /// Writes a file, creating parent directories.
  pub fn write(&self, rel: &str, content: &str) -> Result<()> {
    let path = self.join(rel);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
  }

  pub fn read(&self, rel: &str) -> Result<String> {
    let path = self.join(rel);
    fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
  }

  /// Loads the project's rules.
  pub fn rules(&self) -> Result<RuleSet> {
    load_rules(None, self.path(), TEST_YEAR)
  }

  /// Builds a processor over the whole project.
  pub fn processor(&self, check_only: bool) -> Result<Processor> {
    Processor::new(ProcessorConfig {
      check_only,
      ..ProcessorConfig::new(self.rules()?, self.path().to_path_buf())
    })
  }

  /// Runs a full pass over the project.
  pub fn run(&self) -> Result<Vec<FileReport>> {
    self.processor(false)?.process(self.path())
  }
}

/// Finds the report of `rel`.
pub fn report_for<'a>(reports: &'a [FileReport], rel: &str) -> Option<&'a FileReport> {
  reports.iter().find(|r| r.path == Path::new(rel))
}
