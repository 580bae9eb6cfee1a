use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use sentra_types::{EnforcementDecision, SystemId, TenantId};

use crate::entry::AuditLogEntry;
use crate::error::LedgerError;
use crate::signer::LedgerSigner;
use crate::sink::AuditSink;

/// The audit ledger: signs each decision record and hands it to an
/// append-only sink. Verification recomputes every MAC against the
/// stored content, so a ledger file can be checked offline by anyone
/// holding the key.
pub struct Ledger {
    signer: LedgerSigner,
    sink: Arc<dyn AuditSink>,
}

impl Ledger {
    pub fn new(signer: LedgerSigner, sink: Arc<dyn AuditSink>) -> Self {
        Self { signer, sink }
    }

    /// Sign and append one decision record.
    pub async fn append(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
        environment: &str,
        decision: &EnforcementDecision,
    ) -> Result<AuditLogEntry, LedgerError> {
        let mut entry = AuditLogEntry {
            id: Uuid::new_v4(),
            system_id,
            tenant_id,
            environment: environment.to_string(),
            timestamp: Utc::now(),
            decision: decision.clone(),
            signature: String::new(),
        };
        entry.signature = self.signer.sign(&entry)?;

        self.sink.append(&entry).await?;
        debug!(entry_id = %entry.id, system_id = %system_id, "audit entry appended");
        Ok(entry)
    }

    /// Verify one entry's signature against its stored content.
    pub fn verify_entry(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        self.signer.verify(entry)
    }

    /// Verify every stored entry. Fails on the first mismatch; the error
    /// names the offending entry and is never downgraded to a warning.
    pub async fn verify_all(&self) -> Result<u64, LedgerError> {
        let entries = self.sink.read_all().await?;
        for entry in &entries {
            self.signer.verify(entry)?;
        }
        Ok(entries.len() as u64)
    }

    pub async fn entry_count(&self) -> Result<u64, LedgerError> {
        self.sink.entry_count().await
    }

    pub async fn read_all(&self) -> Result<Vec<AuditLogEntry>, LedgerError> {
        self.sink.read_all().await
    }
}
