//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed when `--verbose` is enabled
//! - `Reporter`, the diagnostics sink handed to every pipeline component
//!
//! # Example
//!
//! ```ignore
//! log!("bundle"; "published {} artifacts", count);
//! debug!("order"; "{} -> {}", from, to);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    error::Error,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold().to_string(),
        "bundle" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Diagnostics sink for the bundling pipeline.
///
/// Recoverable failures (unreadable files, dependency cycles, unreadable
/// config) never abort a run; they are handed to the reporter instead.
pub trait Reporter {
    /// A recoverable error inside `module`.
    fn error(&self, module: &str, error: &dyn Error);

    /// Progress detail, shown only when someone is listening for it.
    fn debug(&self, module: &str, message: &str);
}

/// Reporter that prints through [`log`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn error(&self, module: &str, error: &dyn Error) {
        log(module, &format!("{} {}", "error:".red(), crate::error::chain(error)));
    }

    fn debug(&self, module: &str, message: &str) {
        if is_verbose() {
            log(module, message);
        }
    }
}

/// Reporter that records everything, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub errors: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryReporter {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

#[cfg(test)]
impl Reporter for MemoryReporter {
    fn error(&self, module: &str, error: &dyn Error) {
        self.errors
            .lock()
            .push(format!("[{module}] {}", crate::error::chain(error)));
    }

    fn debug(&self, _module: &str, _message: &str) {}
}

// ============================================================================
// Tests
// ============================================================================
