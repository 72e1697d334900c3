//! Error types for the business rule engine
//!
//! Two kinds of failure leave the engine:
//! - [`ValidationError`]: a business rule was violated. Messages are safe to
//!   show to end users verbatim.
//! - [`StorageError`]: the record store failed. Its detail is for logs only.

use thiserror::Error;

use crate::model::{Field, VehicleId};

/// Business rule violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field absent from the candidate
    #[error("{field} is required")]
    Missing { field: Field },

    /// Field absent or shorter than its minimum after trimming
    #[error("{field} must be at least {min} characters")]
    TooShort { field: Field, min: usize },

    /// Color outside the allowed palette
    #[error("color not allowed, permitted values: {}", .allowed.join(", "))]
    ColorNotAllowed { allowed: Vec<String> },

    #[error("model year must be numeric (e.g. 2019)")]
    ModelYearNotNumeric,

    #[error("vehicle too old, >{max_age} years")]
    VehicleTooOld { max_age: u32 },

    #[error("model year cannot be in the future")]
    ModelYearInFuture,

    /// Input matched the denylist
    #[error("input not allowed")]
    InputNotAllowed,

    #[error("plate already registered")]
    PlateAlreadyRegistered,

    #[error("record not found")]
    RecordNotFound { id: VehicleId },

    #[error("cannot delete protected owner")]
    ProtectedOwner,
}

/// Record store failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store could not be opened or reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A statement failed to prepare or execute
    #[error("query failed: {0}")]
    Query(String),

    /// A store-level constraint rejected the write
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// A stored row could not be mapped back to a record
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StorageError::Unavailable(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        StorageError::Query(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        StorageError::Constraint(msg.into())
    }
}

/// Error returned by engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    /// Whether the error message may be shown to the end user as is
    pub fn is_user_error(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            EngineError::Validation(err) => Some(err),
            EngineError::Storage(_) => None,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
