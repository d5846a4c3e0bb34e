//! Error types for Redwood Core

use std::collections::TryReserveError;

use thiserror::Error;

use crate::invariants::InvariantViolation;
use crate::limits::ConfigError;

/// Result type alias using Redwood's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Redwood error types
///
/// Duplicate inserts and absent keys are not errors; they are reported
/// through the return values of the tree operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Allocation failed while reserving {requested} node slots: {source}")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Node limit reached: {live} live nodes, {requested} more requested (limit {limit})")]
    CapacityExceeded {
        live: usize,
        requested: usize,
        limit: usize,
    },

    #[error("Invariant violated: {0}")]
    InvariantViolated(#[from] InvariantViolation),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
