//! Progress logging.
//!
//! Entries go to stderr, since stdout carries the exported records. The
//! output style is chosen once at start-up with [`init_logging`]: readable
//! text, one JSON object per line for tooling, or errors only.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// How log entries are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Indented text with level markers
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Errors only
    Quiet,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for sub-steps
    #[serde(default)]
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

    /// The line printed for this entry, `None` when `format` hides it.
    pub fn render(&self, format: LogFormat) -> Option<String> {
        match format {
            LogFormat::Quiet if self.level != LogLevel::Error => None,
            LogFormat::Json => serde_json::to_string(self).ok(),
            LogFormat::Text | LogFormat::Quiet => {
                let prefix = match self.level {
                    LogLevel::Info => "   ",
                    LogLevel::Success => "   ✓",
                    LogLevel::Warning => "   ⚠️",
                    LogLevel::Error => "   ❌",
                };
                let indent = "   ".repeat(self.indent as usize);
                Some(format!("{}{} {}", indent, prefix, self.message))
            }
        }
    }
}

static LOG_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Pick the log format for the rest of the process.
///
/// Only the first call has an effect; without any call entries are text.
pub fn init_logging(format: LogFormat) {
    let _ = LOG_FORMAT.set(format);
}

pub fn log_format() -> LogFormat {
    LOG_FORMAT.get().copied().unwrap_or_default()
}

pub fn log(entry: LogEntry) {
    if let Some(line) = entry.render(log_format()) {
        eprintln!("{}", line);
    }
}

pub fn log_info(msg: impl Into<String>) {
    log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    log(LogEntry::info(msg).with_indent(indent));
}
