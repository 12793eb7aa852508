//! # Logging Module
//!
//! This module provides logging utilities for relicense, including:
//! - Verbose logging that can be enabled/disabled
//! - Output modes (normal, quiet, verbose) and color control
//! - A tracing subscriber whose level follows `-v`/`-q`
//!
//! Verbose logs go to stderr.
//!
//! ## Example
//!
//! ```rust
//! use relicense::logging::{ColorMode, set_verbose};
//! use relicense::verbose_log;
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Processing file: {}", "example.rs");
//! ```

mod modes;

pub use modes::{ColorMode, filter_directive, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};

/// Logs a message to stderr if verbose mode is enabled.
///
/// This macro is used for detailed logging that is only shown when verbose mode
/// is enabled via [`set_verbose`]. It uses the same format string syntax as
/// the standard [`eprintln!`] macro.
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}
