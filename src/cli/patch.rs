//! # Patch Command
//!
//! Loads the configuration, processes the target and prints the summary.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Result;
use chrono::Datelike;
use clap::Args;
use tracing::debug;

use crate::config::load_rules;
use crate::diff::DiffManager;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_all_files_ok, print_blank_line, print_hint, print_start_message, print_summary};
use crate::processor::{Processor, ProcessorConfig, absolutize_path, resolve_root};
use crate::report::ProcessingSummary;

/// Arguments for patching headers
#[derive(Args, Debug, Default)]
pub struct PatchArgs {
  /// Project root or single file to process
  #[arg(default_value = ".")]
  pub root: PathBuf,

  /// Path to config file (default: .relicense.toml in the project root)
  #[arg(long, short = 'c', value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// File patterns to ignore (supports glob patterns)
  #[arg(long, short = 'i', value_name = "GLOB")]
  pub ignore: Vec<String>,

  /// Only report files whose header would change; exit with status 1 if any
  #[arg(long)]
  pub check: bool,

  /// Print a diff of every change
  #[arg(long)]
  pub show_diff: bool,

  /// Value of the {year} template variable (default: current year)
  #[arg(long)]
  pub year: Option<String>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and patched paths
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the patch command with the given arguments
pub fn run_patch(args: PatchArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose, args.colors);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let target = absolutize_path(&args.root)?;
  let root = resolve_root(&target)?;
  debug!("Using project root: {}", root.display());

  let year = args.year.unwrap_or_else(|| chrono::Local::now().year().to_string());
  let rules = load_rules(args.config.as_deref(), &root, &year)?;

  let processor = Processor::new(ProcessorConfig {
    check_only: args.check,
    ignore_patterns: args.ignore,
    diff_manager: Some(DiffManager::new(args.show_diff)),
    ..ProcessorConfig::new(rules, root)
  })?;

  let files = processor.collect_files(&target)?;
  print_start_message(files.len(), args.check);

  let start_time = Instant::now();
  let reports = processor.process_collected(&files)?;
  let summary = ProcessingSummary::from_reports(&reports, start_time.elapsed());

  print_blank_line();
  if !summary.has_changes() && summary.unpatchable == 0 {
    print_all_files_ok();
  }
  print_summary(&summary, args.check);

  if args.check && summary.has_changes() {
    print_blank_line();
    print_hint("Run without --check to patch these files.");
    process::exit(1);
  }

  Ok(())
}
