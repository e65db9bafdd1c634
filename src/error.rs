//! Error types returned by `ProbeMap`.

use thiserror::Error;

/// Recoverable input errors. A failed call leaves the map untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// Initial capacity was zero or not a power of two.
    #[error("invalid capacity {requested}: must be a power of two and at least 1")]
    InvalidSize { requested: usize },

    /// Keys must be non-empty.
    #[error("invalid key: keys must be non-empty")]
    InvalidKey,
}

pub type Result<T> = core::result::Result<T, TableError>;
