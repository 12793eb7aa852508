//! # relicense
//!
//! A tool that finds the copyright/license header at the top of each source
//! file in a project, tolerating drift in years and wording, and replaces it
//! with the currently configured header in the file's own comment style.
//!
//! ## Features
//!
//! * Fuzzy, per-line matching of known header variants
//! * Removal of stray copyright lines and blank padding around an old header
//! * Comment styles per file glob, with shebang and encoding lines kept on top
//! * Header templates with variables, built-in license texts and the year
//! * Check mode and diffs to review changes without modifying files
//! * Ignore patterns from the config, the command line and `.relicenseignore`
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use relicense::config::load_rules;
//! use relicense::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new(".");
//!     let rules = load_rules(None, root, "2025")?;
//!
//!     let processor = Processor::new(ProcessorConfig::new(rules, root.to_path_buf()))?;
//!     let reports = processor.process(root)?;
//!
//!     println!("{} files processed", reports.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`headers`] - Header registry, fuzzy block matcher and header remover
//! * [`formats`] - Comment styles: header generation and insertion
//! * [`rules`] - The resolved file rules of a run
//! * [`config`] - Loading `.relicense.toml`
//! * [`processor`] - Walking the tree and patching files
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod config;
pub mod diff;
pub mod formats;
pub mod headers;
pub mod ignore;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod rules;
pub mod templates;
