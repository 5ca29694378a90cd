//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::collections::TryReserveError;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// `Allocation` and `BudgetExceeded` never reach callers of the cache API:
/// they are raised by the admission check and absorbed by the pressure policy.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Growing the arena or the index failed
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Admitting the write would take the cache over its budget
    #[error("Budget exceeded: {entries} entries, {bytes} bytes requested")]
    BudgetExceeded { entries: usize, bytes: usize },

    /// Configuration values are out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns true for the failures the pressure policy recovers from.
    pub fn is_pressure(&self) -> bool {
        matches!(
            self,
            CacheError::Allocation(_) | CacheError::BudgetExceeded { .. }
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
