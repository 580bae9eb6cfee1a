//! Audit Ledger — append-only, MAC-signed record of every enforcement
//! decision.
//!
//! Each entry's signature is a keyed BLAKE3 hash over the canonical byte
//! representation of its fields, so tampering is detectable without
//! revealing the key. Entries are persisted one self-describing JSON
//! record per line, which keeps them verifiable offline, independent of
//! the service that wrote them. The ledger never rewrites or removes
//! prior entries; retention is an external concern.

pub mod entry;
pub mod error;
pub mod ledger;
pub mod signer;
pub mod sink;

pub use entry::AuditLogEntry;
pub use error::LedgerError;
pub use ledger::Ledger;
pub use signer::{LedgerKey, LedgerSigner};
pub use sink::{AuditSink, FileAuditSink, MemoryAuditSink};
