use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::entry::AuditLogEntry;
use crate::error::LedgerError;

/// Symmetric signing key for the audit ledger. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LedgerKey([u8; 32]);

impl LedgerKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// Computes and checks the message-authentication code on audit entries.
///
/// The MAC is a keyed BLAKE3 hash over the entry's canonical bytes:
/// anyone holding the key can verify an entry independently of the
/// service that wrote it, and nobody without the key can alter an entry
/// undetected.
pub struct LedgerSigner {
    key: LedgerKey,
}

impl LedgerSigner {
    pub fn new(key: LedgerKey) -> Self {
        Self { key }
    }

    /// Hex MAC over the entry's canonical bytes (signature field excluded).
    pub fn sign(&self, entry: &AuditLogEntry) -> Result<String, LedgerError> {
        let bytes = entry.canonical_bytes()?;
        let mac = blake3::keyed_hash(&self.key.0, &bytes);
        Ok(hex::encode(mac.as_bytes()))
    }

    /// Recompute the MAC over the stored fields and compare against the
    /// stored signature. Comparison goes through `blake3::Hash` equality,
    /// which is constant-time.
    pub fn verify(&self, entry: &AuditLogEntry) -> Result<(), LedgerError> {
        let bytes = entry.canonical_bytes()?;
        let expected = blake3::keyed_hash(&self.key.0, &bytes);

        let mut stored = [0u8; 32];
        if hex::decode_to_slice(&entry.signature, &mut stored).is_err() {
            return Err(LedgerError::CryptoVerification { entry_id: entry.id });
        }

        if blake3::Hash::from(stored) == expected {
            Ok(())
        } else {
            Err(LedgerError::CryptoVerification { entry_id: entry.id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sentra_types::{
        AuditStatus, DecisionReason, EnforcementDecision, Outcome, SystemId, TenantId,
    };
    use uuid::Uuid;

    fn unsigned_entry() -> AuditLogEntry {
        AuditLogEntry {
            id: Uuid::new_v4(),
            system_id: SystemId::new(),
            tenant_id: TenantId::new(),
            environment: "production".into(),
            timestamp: Utc::now(),
            decision: EnforcementDecision {
                id: Uuid::new_v4(),
                outcome: Outcome::Blocked,
                reason: DecisionReason::ProhibitedPractice,
                risk_score: 10.0,
                confidence: 0.52,
                threats: vec![],
                recommendations: vec![],
                controls_applied: vec![],
                regulatory_impact: None,
                audit_status: AuditStatus::Recorded,
                decided_at: Utc::now(),
            },
            signature: String::new(),
        }
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let signer = LedgerSigner::new(LedgerKey::generate());
        let mut entry = unsigned_entry();
        entry.signature = signer.sign(&entry).unwrap();
        signer.verify(&entry).unwrap();
    }

    #[test]
    fn mutating_any_field_invalidates_signature() {
        let signer = LedgerSigner::new(LedgerKey::generate());
        let mut entry = unsigned_entry();
        entry.signature = signer.sign(&entry).unwrap();

        let mut tampered = entry.clone();
        tampered.environment = "staging".into();
        assert!(signer.verify(&tampered).is_err());

        let mut tampered = entry.clone();
        tampered.decision.risk_score = 0.0;
        assert!(signer.verify(&tampered).is_err());

        let mut tampered = entry.clone();
        tampered.decision.outcome = Outcome::Allowed;
        assert!(signer.verify(&tampered).is_err());

        let mut tampered = entry;
        tampered.tenant_id = TenantId::new();
        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn wrong_key_fails_verification() {
        let signer = LedgerSigner::new(LedgerKey::from_bytes([7u8; 32]));
        let other = LedgerSigner::new(LedgerKey::from_bytes([8u8; 32]));
        let mut entry = unsigned_entry();
        entry.signature = signer.sign(&entry).unwrap();
        assert!(other.verify(&entry).is_err());
    }

    #[test]
    fn malformed_signature_is_a_verification_error() {
        let signer = LedgerSigner::new(LedgerKey::generate());
        let mut entry = unsigned_entry();
        entry.signature = "not-hex".into();
        assert!(matches!(
            signer.verify(&entry),
            Err(LedgerError::CryptoVerification { .. })
        ));
    }
}
