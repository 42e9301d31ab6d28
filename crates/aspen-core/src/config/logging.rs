//! Logging configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Compact,
    /// Multi-line events with source locations and thread info.
    Verbose,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Returns the configuration name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Verbose => "verbose",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "verbose" => Ok(Self::Verbose),
            "json" => Ok(Self::Json),
            other => Err(AppError::configuration(format!("Bad log format: {other}"))),
        }
    }
}

impl TryFrom<String> for LogFormat {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogFormat> for String {
    fn from(format: LogFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map `logging_threshold` to a `tracing` level directive.
///
/// Zero and below log everything down to `debug`; each step up silences
/// one more level.
pub fn threshold_directive(threshold: i32) -> &'static str {
    match threshold {
        i32::MIN..=0 => "debug",
        1 => "info",
        2 => "warn",
        _ => "error",
    }
}
