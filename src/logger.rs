//! Structured logging for intentbot
//!
//! Tag-based leveled logging with:
//! - Standard levels (Error/Warning/Info/Debug)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output with UTC timestamps
//!
//! Call `logger::init()` once at startup (after directories exist), then use
//! the level functions:
//!
//! ```ignore
//! logger::info(LogTag::Swap, "settlement complete");
//! logger::debug(LogTag::Router, "candidate venue ..."); // only with --debug-router
//! ```

use chrono::Utc;
use colored::*;
use std::io::{ self, Write };

use crate::arguments;

/// Module tags carried by every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Command,
    Assets,
    Router,
    Swap,
    Translate,
    Registry,
    Ledger,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Command => "COMMAND",
            LogTag::Assets => "ASSETS",
            LogTag::Router => "ROUTER",
            LogTag::Swap => "SWAP",
            LogTag::Translate => "TRANSLATE",
            LogTag::Registry => "REGISTRY",
            LogTag::Ledger => "LEDGER",
        }
    }

    /// Key used for --debug-<key> command-line flags
    pub fn debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Command => "command",
            LogTag::Assets => "assets",
            LogTag::Router => "router",
            LogTag::Swap => "swap",
            LogTag::Translate => "translate",
            LogTag::Registry => "registry",
            LogTag::Ledger => "ledger",
        }
    }
}

/// Initialize the logger system
///
/// Scans command-line arguments for --debug-<module> flags so that debug
/// output is enabled per module before the first log line is written.
pub fn init() {
    arguments::scan_debug_flags();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    write_line("❌", tag, &message.red().to_string());
}

/// Log at WARNING level (shown unless --quiet)
pub fn warn(tag: LogTag, message: &str) {
    if arguments::is_quiet_enabled() {
        return;
    }
    write_line("⚠", tag, &message.yellow().to_string());
}

/// Log at INFO level (standard operations, shown unless --quiet)
pub fn info(tag: LogTag, message: &str) {
    if arguments::is_quiet_enabled() {
        return;
    }
    write_line("ℹ", tag, message);
}

/// Log at DEBUG level (only with --debug-<module> or --verbose)
pub fn debug(tag: LogTag, message: &str) {
    if !arguments::is_debug_enabled(tag.debug_key()) {
        return;
    }
    write_line("🐛", tag, &message.dimmed().to_string());
}

fn write_line(symbol: &str, tag: LogTag, message: &str) {
    let timestamp = Utc::now().format("%H:%M:%S").to_string();
    println!(
        "{} {} {} {}",
        symbol,
        tag.as_str().bold(),
        format!("[{}]", timestamp).dimmed(),
        message
    );
    let _ = io::stdout().flush();
}
