//! Errors raised by the hook registry and by hooks themselves.

use http::{HeaderMap, StatusCode};
use thiserror::Error;

use aspen_core::error::{AppError, ErrorKind};

use crate::definitions::{HookPhase, PhaseKind};

/// Result alias for hook operations.
pub type HookResult<T> = Result<T, HookError>;

/// Errors from hook registration, lookup, and invocation.
#[derive(Debug, Error)]
pub enum HookError {
    /// The name does not match any of the six phases.
    #[error("no hook phase named '{0}'")]
    UnknownPhase(String),

    /// The phase exists but holds the other kind of hook.
    #[error("phase '{phase}' is not a {expected} phase")]
    PhaseKind {
        /// The phase that was asked for.
        phase: HookPhase,
        /// The kind the caller expected.
        expected: PhaseKind,
    },

    /// Positional access outside the sequence.
    #[error("index {index} out of range for hook of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The sequence length at the time of the call.
        len: usize,
    },

    /// The hook is not registered in the phase.
    #[error("hook '{name}' is not registered")]
    NotFound {
        /// Name of the missing hook.
        name: String,
    },

    /// A request hook answers the request itself; the pipeline sends this
    /// response instead of running the resource.
    #[error("request answered with {status}")]
    Respond {
        /// Response status.
        status: StatusCode,
        /// Response headers.
        headers: HeaderMap,
        /// Response body.
        body: String,
    },

    /// A hook failed.
    #[error("hook '{hook}' failed: {message}")]
    Failed {
        /// Name of the failing hook.
        hook: String,
        /// What went wrong.
        message: String,
    },
}

impl HookError {
    /// Creates a failure for the hook named `hook`.
    pub fn failed(hook: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            hook: hook.to_string(),
            message: message.into(),
        }
    }

    /// Creates a response short-circuit with an empty header map.
    pub fn respond(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Status the pipeline should answer with when this error ends a request.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Respond { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HookError> for AppError {
    fn from(err: HookError) -> Self {
        let kind = match &err {
            HookError::UnknownPhase(_) | HookError::NotFound { .. } => ErrorKind::NotFound,
            HookError::PhaseKind { .. } | HookError::IndexOutOfRange { .. } => {
                ErrorKind::Validation
            }
            HookError::Respond { status, .. } if *status == StatusCode::SERVICE_UNAVAILABLE => {
                ErrorKind::ServiceUnavailable
            }
            HookError::Respond { .. } | HookError::Failed { .. } => ErrorKind::Hook,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}
