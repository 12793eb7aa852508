//! # Configuration Module
//!
//! This module loads the `.relicense.toml` file that drives a run and resolves
//! it into a [`RuleSet`].
//!
//! Configuration is looked up from the `--config` flag, then the
//! `RELICENSE_CONFIG` environment variable, then the project root.
//!
//! ```toml
//! ignore = ["target/**"]
//!
//! [variables]
//! owner = "Jane Doe"
//! notice = "Copyright {year} {owner}\n{MPL-2.0}"
//!
//! [headers]
//! old-notice = "Copyright 2018 Jane Doe"
//!
//! [global]
//! header = "{notice}"
//!
//! [files."*.py"]
//! rstrip = true
//!
//! [formats."*.lua"]
//! style = "line"
//! prefix = "-- "
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::formats::{CommentStyle, Decoration, FormatRule, FormatTable};
use crate::headers::HeaderRegistry;
use crate::rules::{FileRule, RuleSet};
use crate::templates::{TemplateError, Variables};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".relicense.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "RELICENSE_CONFIG";

/// Name of the template variable holding the copyright year.
pub const YEAR_VARIABLE: &str = "year";

/// Header and whitespace settings for a group of files.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
  /// Header template. An empty template counts as unset.
  #[serde(default)]
  pub header: Option<String>,

  /// Trim trailing whitespace from every line.
  #[serde(default)]
  pub rstrip: Option<bool>,
}

/// Kind of a configured comment style.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
  Line,
  Shebang,
  Block,
}

/// User-defined comment style for a file glob.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FormatConfig {
  pub style: StyleKind,

  /// Prefix of every header line (e.g. "// " or " * ").
  pub prefix: String,

  /// Prefix of the first line of a block comment (e.g. "/* ").
  #[serde(default)]
  pub first: Option<String>,

  /// Suffix of the last line of a block comment (e.g. " */").
  #[serde(default)]
  pub last: Option<String>,

  /// Directive marker kept above the header. Defaults to the trimmed prefix.
  #[serde(default)]
  pub marker: Option<String>,
}

/// Main configuration struct, as read from `.relicense.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// Globs of paths never processed.
  #[serde(default)]
  pub ignore: Vec<String>,

  /// Template variables, evaluated in order.
  #[serde(default)]
  pub variables: IndexMap<String, String>,

  /// Extra header variants (typically historical ones) to recognise.
  #[serde(default)]
  pub headers: IndexMap<String, String>,

  /// Defaults for every file rule.
  #[serde(default)]
  pub global: RuleConfig,

  /// File rules keyed by glob; the first matching glob applies.
  #[serde(default)]
  pub files: IndexMap<String, RuleConfig>,

  /// Comment styles keyed by glob, consulted before the built-in ones.
  #[serde(default)]
  pub formats: IndexMap<String, FormatConfig>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A glob in `[files]` or `[formats]` does not compile.
  #[error("Invalid glob '{glob}': {source}")]
  InvalidGlob { glob: String, source: glob::PatternError },

  /// A variable or header template could not be rendered.
  #[error("Invalid template in '{key}': {source}")]
  InvalidTemplate { key: String, source: TemplateError },

  /// A comment style configuration is invalid.
  #[error("Invalid comment style for '{glob}': {message}")]
  InvalidCommentStyle { glob: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read or
  /// parsed.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    verbose_log!(
      "Loaded {} file rules and {} comment style overrides",
      config.files.len(),
      config.formats.len()
    );

    Ok(config)
  }

  /// Parses configuration from TOML text.
  pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Resolves templates, globs and styles into a [`RuleSet`].
  ///
  /// # Arguments
  ///
  /// * `year` - Value of the `{year}` variable unless the config defines it
  pub fn resolve(&self, year: &str) -> Result<RuleSet, ConfigError> {
    let mut registry = HeaderRegistry::with_builtins();
    for (name, text) in &self.headers {
      registry.register(name.as_str(), text);
    }

    let mut variables = Variables::new();
    for (_, variant) in registry.iter() {
      variables.insert(variant.name(), variant.text());
    }
    variables.insert(YEAR_VARIABLE, year);

    for (name, template) in &self.variables {
      variables
        .define(name.as_str(), template)
        .map_err(|source| ConfigError::InvalidTemplate {
          key: format!("variables.{name}"),
          source,
        })?;
    }

    let global_header = parse_header(&variables, self.global.header.as_deref(), "global.header")?;
    let global_rstrip = self.global.rstrip.unwrap_or(false);

    let mut files = Vec::with_capacity(self.files.len());
    for (glob, rule) in &self.files {
      let pattern = compile_glob(glob)?;
      let header = match parse_header(&variables, rule.header.as_deref(), &format!("files.\"{glob}\".header"))? {
        Some(header) => Some(header),
        None => global_header.clone(),
      };

      // The header written now must be recognised on the next run.
      if let Some(ref lines) = header {
        registry.register_lines(format!("files:{glob}"), lines.clone());
      }

      files.push(FileRule::new(pattern, header, rule.rstrip.unwrap_or(global_rstrip)));
    }

    let mut formats = Vec::with_capacity(self.formats.len());
    for (glob, format) in &self.formats {
      formats.push(FormatRule::new(compile_glob(glob)?, format.to_style(glob)?));
    }

    Ok(RuleSet {
      registry,
      files,
      formats: FormatTable::with_overrides(formats),
      ignore: self.ignore.clone(),
    })
  }
}

impl FormatConfig {
  /// Validates the entry and converts it into a [`CommentStyle`].
  fn to_style(&self, glob: &str) -> Result<CommentStyle, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidCommentStyle {
      glob: glob.to_string(),
      message: message.to_string(),
    };

    if self.prefix.is_empty() {
      return Err(invalid("prefix cannot be empty"));
    }

    match self.style {
      StyleKind::Line | StyleKind::Shebang if self.first.is_some() || self.last.is_some() => {
        Err(invalid("only block styles take 'first' and 'last'"))
      }
      StyleKind::Line | StyleKind::Block if self.marker.is_some() => Err(invalid("only shebang styles take 'marker'")),
      StyleKind::Line => Ok(CommentStyle::line(&self.prefix)),
      StyleKind::Shebang => {
        let marker = self.marker.clone().unwrap_or_else(|| self.prefix.trim().to_string());
        if marker.is_empty() {
          return Err(invalid("marker cannot be empty"));
        }
        Ok(CommentStyle::shebang(&self.prefix, &marker))
      }
      StyleKind::Block => {
        if self.first.is_none() && self.last.is_none() {
          return Err(invalid("block styles need 'first' or 'last'"));
        }
        Ok(CommentStyle::Block(Decoration {
          first: self.first.clone(),
          middle: self.prefix.clone(),
          last: self.last.clone(),
        }))
      }
    }
  }
}

fn compile_glob(glob: &str) -> Result<Pattern, ConfigError> {
  Pattern::new(glob).map_err(|source| ConfigError::InvalidGlob {
    glob: glob.to_string(),
    source,
  })
}

/// Renders a header template and splits it into trimmed lines.
fn parse_header(variables: &Variables, template: Option<&str>, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
  let Some(template) = template.filter(|t| !t.trim().is_empty()) else {
    return Ok(None);
  };

  let rendered = variables
    .render(template)
    .map_err(|source| ConfigError::InvalidTemplate {
      key: key.to_string(),
      source,
    })?;

  let rendered = rendered.trim();
  if rendered.is_empty() {
    return Ok(None);
  }

  Ok(Some(rendered.split('\n').map(|line| line.trim().to_string()).collect()))
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `RELICENSE_CONFIG` environment variable
/// 3. `.relicense.toml` in the project root
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using project config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Discovers, loads and resolves the configuration.
///
/// A missing config file is an error: without rules there is nothing to do.
pub fn load_rules(explicit_path: Option<&Path>, root: &Path, year: &str) -> Result<RuleSet> {
  let path = discover_config_path(explicit_path, root).with_context(|| match explicit_path {
    Some(path) => format!("Config file not found: {}", path.display()),
    None => format!(
      "No {} found in {} (set {} or pass --config)",
      DEFAULT_CONFIG_FILENAME,
      root.display(),
      CONFIG_ENV_VAR
    ),
  })?;

  let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
  let rules = config
    .resolve(year)
    .with_context(|| format!("Invalid configuration in {}", path.display()))?;

  verbose_log!(
    "Resolved {} file rules, {} known headers",
    rules.files.len(),
    rules.registry.len()
  );

  Ok(rules)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn resolve(content: &str) -> Result<RuleSet, ConfigError> {
    Config::parse(content).expect("config should parse").resolve("2025")
  }

  #[test]
  fn test_parse_full_config() {
    let config = Config::parse(concat!(
      "ignore = [\"target/**\"]\n",
      "\n",
      "[variables]\n",
      "owner = \"A\"\n",
      "\n",
      "[global]\n",
      "header = \"Copyright {year} {owner}\"\n",
      "\n",
      "[files.\"*.py\"]\n",
      "rstrip = true\n",
      "\n",
      "[files.\"*.rs\"]\n",
      "\n",
      "[formats.\"*.lua\"]\n",
      "style = \"line\"\n",
      "prefix = \"-- \"\n",
    ))
    .expect("config should parse");

    assert_eq!(config.ignore, ["target/**"]);
    assert_eq!(config.files.keys().collect::<Vec<_>>(), ["*.py", "*.rs"]);
    assert_eq!(config.files["*.py"].rstrip, Some(true));
    assert_eq!(config.formats["*.lua"].style, StyleKind::Line);
  }

  #[test]
  fn test_parse_empty_config() {
    let config = Config::parse("").expect("empty config should parse");

    assert!(config.files.is_empty());
    assert!(config.ignore.is_empty());
  }

  #[test]
  fn test_files_keep_document_order() {
    let config = Config::parse(concat!(
      "[files.\"z/*\"]\n",
      "[files.\"a/*\"]\n",
      "[files.\"m/*\"]\n",
    ))
    .expect("config should parse");

    assert_eq!(config.files.keys().collect::<Vec<_>>(), ["z/*", "a/*", "m/*"]);
  }

  #[test]
  fn test_resolve_inherits_global() {
    let rules = resolve(concat!(
      "[global]\n",
      "header = \"Copyright {year} A\\nMPL 2.0\"\n",
      "rstrip = true\n",
      "\n",
      "[files.\"*.py\"]\n",
      "[files.\"*.rs\"]\n",
      "header = \"Copyright B\"\n",
      "rstrip = false\n",
    ))
    .expect("config should resolve");

    let py = rules.select("a.py").expect("python rule");
    assert_eq!(py.header(), Some(&["Copyright 2025 A".to_string(), "MPL 2.0".to_string()][..]));
    assert!(py.rstrip());

    let rs = rules.select("a.rs").expect("rust rule");
    assert_eq!(rs.header(), Some(&["Copyright B".to_string()][..]));
    assert!(!rs.rstrip());
  }

  #[test]
  fn test_resolve_header_lines_are_trimmed() {
    let rules = resolve(concat!(
      "[files.\"*.py\"]\n",
      "header = \"\"\"\n",
      "    Copyright 2020 A\n",
      "    MPL 2.0\n",
      "\"\"\"\n",
    ))
    .expect("config should resolve");

    let rule = rules.select("x.py").expect("python rule");
    assert_eq!(rule.header(), Some(&["Copyright 2020 A".to_string(), "MPL 2.0".to_string()][..]));
  }

  #[test]
  fn test_resolve_builtin_header_variable() {
    let rules = resolve(concat!(
      "[variables]\n",
      "notice = \"Copyright {year} A\\n{MPL-2.0}\"\n",
      "[files.\"*.py\"]\n",
      "header = \"{notice}\"\n",
    ))
    .expect("config should resolve");

    let header = rules.select("x.py").and_then(|r| r.header()).expect("header");
    assert_eq!(header.len(), 4);
    assert_eq!(header[0], "Copyright 2025 A");
    assert_eq!(header[1], "This Source Code Form is subject to the terms of the");
  }

  #[test]
  fn test_resolve_registers_headers() {
    let rules = resolve(concat!(
      "[headers]\n",
      "old = \"Copyright 2018 A\"\n",
      "[files.\"*.py\"]\n",
      "header = \"Copyright 2020 A\"\n",
    ))
    .expect("config should resolve");

    assert!(rules.registry.find("old").is_some());
    let current = rules.registry.find("files:*.py").expect("rule header registered");
    assert_eq!(current.lines(), ["Copyright 2020 A"]);
  }

  #[test]
  fn test_resolve_config_year_overrides_default() {
    let rules = resolve(concat!(
      "[variables]\n",
      "year = \"2019-2021\"\n",
      "[files.\"*\"]\n",
      "header = \"Copyright {year}\"\n",
    ))
    .expect("config should resolve");

    assert_eq!(
      rules.select("x").and_then(|r| r.header()),
      Some(&["Copyright 2019-2021".to_string()][..])
    );
  }

  #[test]
  fn test_resolve_unknown_variable() {
    let err = resolve("[files.\"*.py\"]\nheader = \"{nope}\"\n").expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidTemplate { .. }));
  }

  #[test]
  fn test_resolve_invalid_glob() {
    let err = resolve("[files.\"[\"]\nheader = \"x\"\n").expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidGlob { .. }));
  }

  #[test]
  fn test_resolve_file_without_header() {
    let rules = resolve("[files.\"*.txt\"]\nrstrip = true\n").expect("config should resolve");
    let rule = rules.select("notes.txt").expect("rule");

    assert!(rule.header().is_none());
    assert!(rule.rstrip());
  }

  #[test]
  fn test_format_styles() {
    let rules = resolve(concat!(
      "[formats.\"*.lua\"]\n",
      "style = \"line\"\n",
      "prefix = \"-- \"\n",
      "[formats.\"*.nix\"]\n",
      "style = \"shebang\"\n",
      "prefix = \"# \"\n",
      "[formats.\"*.css\"]\n",
      "style = \"block\"\n",
      "first = \"/* \"\n",
      "prefix = \" * \"\n",
      "last = \" */\"\n",
      "[files.\"*\"]\n",
      "header = \"x\"\n",
    ))
    .expect("config should resolve");

    assert_eq!(rules.formats.lookup("*.lua", "a.lua"), Some(&CommentStyle::line("-- ")));
    assert_eq!(rules.formats.lookup("*.nix", "a.nix"), Some(&CommentStyle::shebang("# ", "#")));
    assert_eq!(
      rules.formats.lookup("*.css", "a.css"),
      Some(&CommentStyle::block("/* ", " * ", " */"))
    );
  }

  #[test]
  fn test_format_validation() {
    let cases = [
      "[formats.\"*.x\"]\nstyle = \"line\"\nprefix = \"\"\n",
      "[formats.\"*.x\"]\nstyle = \"line\"\nprefix = \"# \"\nlast = \" */\"\n",
      "[formats.\"*.x\"]\nstyle = \"block\"\nprefix = \" * \"\n",
      "[formats.\"*.x\"]\nstyle = \"block\"\nprefix = \" * \"\nfirst = \"/*\"\nmarker = \"#\"\n",
    ];

    for case in cases {
      let err = resolve(case).expect_err("invalid style should fail");
      assert!(matches!(err, ConfigError::InvalidCommentStyle { .. }), "case: {case}");
    }
  }

  #[test]
  fn test_unknown_style_kind_fails_to_parse() {
    assert!(Config::parse("[formats.\"*.x\"]\nstyle = \"fancy\"\nprefix = \"# \"\n").is_err());
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = Config::load(Path::new("/nonexistent/path/.relicense.toml"));
    assert!(matches!(
      result.expect_err("should fail"),
      ConfigError::ReadError { .. }
    ));
  }

  #[test]
  fn test_load_config_parse_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "files = [").expect("write config");

    assert!(matches!(
      Config::load(&config_path).expect_err("should fail"),
      ConfigError::ParseError { .. }
    ));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom-config.toml");
    std::fs::write(&config_path, "").expect("write config");

    let result = discover_config_path(Some(&config_path), temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_discover_config_missing_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "").expect("write config");

    let result = discover_config_path(Some(&temp_dir.path().join("missing.toml")), temp_dir.path());
    assert!(result.is_none());
  }

  #[test]
  fn test_discover_config_root() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "").expect("write config");

    let result = discover_config_path(None, temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_load_rules_without_config_fails() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let missing = temp_dir.path().join("missing.toml");

    assert!(load_rules(Some(&missing), temp_dir.path(), "2025").is_err());
  }
}
