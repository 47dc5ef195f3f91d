//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where configuration problems can surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid simulation time {0}: must be finite and non-negative")]
    InvalidTime(f64),
}

/// Shorthand result type for `ep-core`.
pub type CoreResult<T> = Result<T, CoreError>;
