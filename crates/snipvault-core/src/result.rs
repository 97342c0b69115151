//! Convenience result type alias for SnipVault.

use crate::error::AppError;

/// A specialized `Result` type for SnipVault operations.
pub type AppResult<T> = Result<T, AppError>;
