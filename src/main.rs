//! # relicense
//!
//! Replaces drifted copyright/license headers with the configured ones.

use anyhow::Result;
use relicense::cli::{Cli, run_patch};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_patch(cli.patch_args)
}
