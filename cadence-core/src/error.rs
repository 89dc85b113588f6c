//! Error types for the cadence ecosystem.

use thiserror::Error;

/// Errors that can occur in cadence operations.
///
/// Every error aborts the request it occurred in; there are no
/// partial-success outcomes. Validation and permission failures are
/// raised before any mutating store call on their branch.
#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Base event not found: {0}")]
    BaseNotFound(String),

    #[error("User '{user}' may not modify event '{event}'")]
    PermissionDenied { user: String, event: String },

    #[error("Store failure: {0}")]
    Store(String),
}

/// Result type alias for cadence operations.
pub type CadenceResult<T> = Result<T, CadenceError>;
