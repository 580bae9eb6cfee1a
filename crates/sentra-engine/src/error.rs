use thiserror::Error;

use sentra_ledger::LedgerError;
use sentra_types::{OperationalStatus, ValidationError};

/// Errors the enforcement engine surfaces to callers.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Returned uniformly for systems that do not exist, belong to another
    /// tenant, or could not be fetched in time. Callers cannot distinguish
    /// the three, so lookups leak no cross-tenant information.
    #[error("system not found")]
    NotFound,

    #[error("status transition {from} -> {to} rejected: {detail}")]
    InvalidTransition {
        from: OperationalStatus,
        to: OperationalStatus,
        detail: String,
    },

    #[error("operator {operator_id} lacks the role required for this action")]
    Unauthorized { operator_id: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
