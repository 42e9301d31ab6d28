//! Deployment mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Deployment mode the website runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Verbose diagnostics for interactive debugging.
    Debugging,
    /// Local development.
    #[default]
    Development,
    /// Pre-production.
    Staging,
    /// Live traffic.
    Production,
}

impl Mode {
    /// Returns the canonical name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debugging => "debugging",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Debugging or development.
    pub fn is_debdev(&self) -> bool {
        matches!(self, Self::Debugging | Self::Development)
    }

    /// Staging or production.
    pub fn is_stprod(&self) -> bool {
        !self.is_debdev()
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debugging" | "deb" => Ok(Self::Debugging),
            "development" | "dev" => Ok(Self::Development),
            "staging" | "st" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::configuration(format!("Bad mode: {other}"))),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
