use thiserror::Error;
use uuid::Uuid;

/// Errors from the audit ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored signature does not verify against the stored content.
    /// Raised only during verification, never during append, and never
    /// suppressed.
    #[error("audit entry {entry_id} failed signature verification")]
    CryptoVerification { entry_id: Uuid },
}
