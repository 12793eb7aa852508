//! # Templates Module
//!
//! Header text in the configuration is a template: `{name}` is replaced by the
//! value of variable `name`, and `{{` / `}}` stand for literal braces.
//!
//! Variables are defined in order, and a variable's value may itself use any
//! variable defined before it. Every registered header is available as a
//! variable under its registry name, and `year` holds the current year.
//!
//! ## Example
//!
//! ```rust
//! use relicense::templates::Variables;
//!
//! # fn main() -> Result<(), relicense::templates::TemplateError> {
//! let mut variables = Variables::new();
//! variables.insert("year", "2025");
//! variables.define("notice", "Copyright {year} Jane Doe")?;
//!
//! assert_eq!(variables.render("{notice} {{sic}}")?, "Copyright 2025 Jane Doe {sic}");
//! # Ok(())
//! # }
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::trace;

/// Error raised while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
  /// The template refers to a variable that is not defined.
  #[error("Unknown variable '{name}'")]
  UnknownVariable { name: String },

  /// A single `{` or `}` that does not belong to a placeholder.
  #[error("Unmatched '{brace}' at byte {offset}")]
  UnmatchedBrace { brace: char, offset: usize },
}

/// Ordered set of template variables.
#[derive(Debug, Clone, Default)]
pub struct Variables {
  values: IndexMap<String, String>,
}

impl Variables {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets a variable to a literal value, replacing any previous value.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.values.insert(name.into(), value.into());
  }

  /// Renders `template` against the variables defined so far and stores the
  /// result under `name`.
  pub fn define(&mut self, name: impl Into<String>, template: &str) -> Result<(), TemplateError> {
    let value = self.render(template)?;
    self.insert(name, value);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Substitutes every `{name}` placeholder in `template`.
  pub fn render(&self, template: &str) -> Result<String, TemplateError> {
    static PLACEHOLDER: LazyLock<Regex> =
      LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("placeholder regex must compile"));

    let mut error = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
      let whole = caps.get(0).map_or("", |m| m.as_str());
      match whole {
        "{{" => "{".to_string(),
        "}}" => "}".to_string(),
        "{" | "}" => {
          let offset = caps.get(0).map_or(0, |m| m.start());
          error.get_or_insert(TemplateError::UnmatchedBrace {
            brace: if whole == "{" { '{' } else { '}' },
            offset,
          });
          String::new()
        }
        _ => {
          let name = caps.get(1).map_or("", |m| m.as_str()).trim();
          match self.get(name) {
            Some(value) => {
              trace!("Substituting variable '{}'", name);
              value.to_string()
            }
            None => {
              error.get_or_insert(TemplateError::UnknownVariable { name: name.to_string() });
              String::new()
            }
          }
        }
      }
    });

    match error {
      Some(e) => Err(e),
      None => Ok(rendered.into_owned()),
    }
  }
}
