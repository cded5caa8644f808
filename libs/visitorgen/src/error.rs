//! Error types.
//!
//! A generation pass itself never fails: per-declaration problems are
//! skipped and cancellation is reported through [`PassOutcome`](crate::PassOutcome).
//! Only configuration can be rejected up front.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid artifact extension {0:?}: must be non-empty without dots, whitespace or path separators")]
    InvalidExtension(String),
}

/// Cancellation observed mid-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;
