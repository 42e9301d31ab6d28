//! Convenience result type alias for Aspen.

use crate::error::AppError;

/// A specialized `Result` type for Aspen operations.
pub type AppResult<T> = Result<T, AppError>;
