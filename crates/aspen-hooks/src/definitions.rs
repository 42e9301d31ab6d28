//! Hook phase definitions and the default request payload.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HookError;

/// The six points in the process and request lifecycle where hooks run.
///
/// Variants are declared in lifecycle order, so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Once, before the website starts serving.
    Startup,
    /// First thing for every inbound request.
    InboundEarly,
    /// Right before a request is handed to its resource.
    InboundLate,
    /// Right after the resource produced a response.
    OutboundEarly,
    /// Last thing before the response leaves.
    OutboundLate,
    /// Once, after the website stopped serving.
    Shutdown,
}

/// Whether a phase runs once per process or once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// `startup` and `shutdown`.
    Lifecycle,
    /// `inbound_*` and `outbound_*`.
    Request,
}

impl HookPhase {
    /// Every phase, in lifecycle order.
    pub const ALL: [HookPhase; 6] = [
        Self::Startup,
        Self::InboundEarly,
        Self::InboundLate,
        Self::OutboundEarly,
        Self::OutboundLate,
        Self::Shutdown,
    ];

    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::InboundEarly => "inbound_early",
            Self::InboundLate => "inbound_late",
            Self::OutboundEarly => "outbound_early",
            Self::OutboundLate => "outbound_late",
            Self::Shutdown => "shutdown",
        }
    }

    /// Returns whether this phase runs per process or per request.
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Startup | Self::Shutdown => PhaseKind::Lifecycle,
            _ => PhaseKind::Request,
        }
    }

    /// Returns whether this phase receives the in-flight request.
    pub fn is_request_phase(&self) -> bool {
        self.kind() == PhaseKind::Request
    }
}

impl FromStr for HookPhase {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| HookError::UnknownPhase(s.to_string()))
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifecycle => write!(f, "lifecycle"),
            Self::Request => write!(f, "request"),
        }
    }
}

/// In-flight request carried through the request phases.
///
/// The network engine fills in method, path and headers; hooks share
/// state with each other and with the resource through `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique id of this request.
    pub id: Uuid,
    /// HTTP method.
    pub method: String,
    /// Request path, without the query string.
    pub path: String,
    /// Request headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Arbitrary data keyed by string.
    pub data: HashMap<String, serde_json::Value>,
    /// When the request arrived.
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: method.to_string(),
            path: path.to_string(),
            headers: HashMap::new(),
            data: HashMap::new(),
            received_at: Utc::now(),
        }
    }

    /// Sets a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Inserts a data value.
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Gets a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Gets a data value by key.
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Sets a data value, replacing any previous one.
    pub fn set_data(&mut self, key: &str, value: serde_json::Value) {
        self.data.insert(key.to_string(), value);
    }
}
