//! Shutdown and logging configuration types.

use serde::{Deserialize, Serialize};

/// Shutdown behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time a process gets to exit voluntarily after a polite
    /// termination request before it is force-killed.
    pub grace_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_timeout_secs: 5,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive string for the tracing env filter.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_defaults() {
        assert_eq!(ShutdownConfig::default().grace_timeout_secs, 5);
    }

    #[test]
    fn log_level_serialization() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        let parsed: LogLevel = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(parsed, LogLevel::Debug);
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::Info.as_directive(), "info");
        assert_eq!(LogLevel::Warning.as_directive(), "warn");
    }
}
