use std::io::IsTerminal;
use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Global output mode shared by the logging macros and the output module.
///
/// This is initialized to `Normal` and changed once at startup via
/// [`set_verbose`] or [`set_quiet`].
static OUTPUT_MODE: AtomicU8 = AtomicU8::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
  Normal = 0,
  Quiet = 1,
  Verbose = 2,
}

impl OutputMode {
  const fn from_u8(value: u8) -> Self {
    match value {
      1 => Self::Quiet,
      2 => Self::Verbose,
      _ => Self::Normal,
    }
  }

  fn current() -> Self {
    Self::from_u8(OUTPUT_MODE.load(Ordering::SeqCst))
  }
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
  /// Use colors when the output stream is a terminal
  #[default]
  Auto,
  /// Never use colors
  Never,
  /// Always use colors
  Always,
}

impl ColorMode {
  /// Applies the mode to every owo-colors call in the process.
  pub fn apply(self) {
    match self {
      Self::Auto => owo_colors::unset_override(),
      Self::Never => owo_colors::set_override(false),
      Self::Always => owo_colors::set_override(true),
    }
  }

  /// Whether log lines written to stderr should carry ANSI codes.
  pub fn stderr_ansi(self) -> bool {
    match self {
      Self::Auto => std::io::stderr().is_terminal(),
      Self::Never => false,
      Self::Always => true,
    }
  }
}

/// Enables verbose output for [`verbose_log!`](crate::verbose_log).
pub fn set_verbose() {
  OUTPUT_MODE.store(OutputMode::Verbose as u8, Ordering::SeqCst);
}

/// Suppresses everything but errors.
pub fn set_quiet() {
  OUTPUT_MODE.store(OutputMode::Quiet as u8, Ordering::SeqCst);
}

/// Checks if verbose logging is currently enabled.
pub fn is_verbose() -> bool {
  OutputMode::current() == OutputMode::Verbose
}

/// Checks if quiet mode is currently enabled.
pub fn is_quiet() -> bool {
  OutputMode::current() == OutputMode::Quiet
}

/// Maps the command line verbosity to a tracing filter directive.
///
/// `-v` shows info, `-vv` debug and `-vvv` trace events of this crate. Quiet
/// mode only lets errors through.
pub fn filter_directive(quiet: bool, verbose: u8) -> &'static str {
  if quiet {
    return "error";
  }

  match verbose {
    0 => "warn",
    1 => "warn,relicense=info",
    2 => "warn,relicense=debug",
    _ => "warn,relicense=trace",
  }
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the command line verbosity. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_tracing(quiet: bool, verbose: u8, colors: ColorMode) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(quiet, verbose)));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_ansi(colors.stderr_ansi())
    .with_writer(std::io::stderr)
    .try_init();
}
