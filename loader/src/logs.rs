//! Operator-facing console log.
//!
//! Lines go to stderr with a level prefix so the operator can follow the run
//! (and abort during the warning delay). Each line is also emitted as a
//! `tracing` event under the `paysheet::console` target.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Indentation level (for nested lines)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render the entry as a console line.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global console
pub static CONSOLE: Lazy<Console> = Lazy::new(Console::new);

/// Writes log entries to stderr unless silenced.
pub struct Console {
    quiet: AtomicBool,
}

impl Console {
    pub fn new() -> Self {
        Self { quiet: AtomicBool::new(false) }
    }

    /// Silence info and success lines. Warnings and errors always print.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn log(&self, entry: LogEntry) {
        match entry.level {
            LogLevel::Info | LogLevel::Success => {
                tracing::debug!(target: "paysheet::console", "{}", entry.message)
            }
            LogLevel::Warning => tracing::warn!(target: "paysheet::console", "{}", entry.message),
            LogLevel::Error => tracing::error!(target: "paysheet::console", "{}", entry.message),
        }

        let always = matches!(entry.level, LogLevel::Warning | LogLevel::Error);
        if always || !self.quiet.load(Ordering::Relaxed) {
            eprintln!("{}", entry.render());
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    CONSOLE.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    CONSOLE.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    CONSOLE.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    CONSOLE.log(LogEntry::error(msg));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    CONSOLE.log(LogEntry::warning(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefixes() {
        assert_eq!(LogEntry::info("reading").render(), "    reading");
        assert_eq!(LogEntry::success("done").render(), "   ✓ done");
        assert!(LogEntry::error("boom").render().contains("❌ boom"));
    }

    #[test]
    fn test_render_indent() {
        let line = LogEntry::warning("line 4").with_indent(1).render();
        assert!(line.starts_with("      ⚠️"));
        assert!(line.ends_with("line 4"));
    }
}
