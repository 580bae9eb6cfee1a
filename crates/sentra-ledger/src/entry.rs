use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sentra_types::{EnforcementDecision, SystemId, TenantId};

use crate::error::LedgerError;

/// One immutable audit record: the full decision plus its identifying
/// context and the signature computed over the canonical serialization of
/// everything else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub system_id: SystemId,
    pub tenant_id: TenantId,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub decision: EnforcementDecision,
    /// Hex-encoded keyed-BLAKE3 MAC over [`AuditLogEntry::canonical_bytes`].
    pub signature: String,
}

/// The signed view of an entry: every field except the signature itself,
/// serialized in declaration order. Signing and verification both go
/// through this view, so the MAC binds the exact stored content.
#[derive(Serialize)]
struct UnsignedEntry<'a> {
    id: &'a Uuid,
    system_id: &'a SystemId,
    tenant_id: &'a TenantId,
    environment: &'a str,
    timestamp: &'a DateTime<Utc>,
    decision: &'a EnforcementDecision,
}

impl AuditLogEntry {
    /// Canonical bytes the signature covers.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        let unsigned = UnsignedEntry {
            id: &self.id,
            system_id: &self.system_id,
            tenant_id: &self.tenant_id,
            environment: &self.environment,
            timestamp: &self.timestamp,
            decision: &self.decision,
        };
        Ok(serde_json::to_vec(&unsigned)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_types::{AuditStatus, DecisionReason, Outcome};

    fn entry() -> AuditLogEntry {
        AuditLogEntry {
            id: Uuid::new_v4(),
            system_id: SystemId::new(),
            tenant_id: TenantId::new(),
            environment: "production".into(),
            timestamp: Utc::now(),
            decision: EnforcementDecision {
                id: Uuid::new_v4(),
                outcome: Outcome::Allowed,
                reason: DecisionReason::WithinPolicy,
                risk_score: 1.5,
                confidence: 0.6,
                threats: vec![],
                recommendations: vec![],
                controls_applied: vec!["threat_classification".into()],
                regulatory_impact: None,
                audit_status: AuditStatus::Recorded,
                decided_at: Utc::now(),
            },
            signature: String::new(),
        }
    }

    #[test]
    fn canonical_bytes_exclude_signature() {
        let mut e = entry();
        let before = e.canonical_bytes().unwrap();
        e.signature = "deadbeef".into();
        let after = e.canonical_bytes().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn canonical_bytes_cover_every_other_field() {
        let base = entry();

        let mut changed = base.clone();
        changed.environment = "staging".into();
        assert_ne!(
            base.canonical_bytes().unwrap(),
            changed.canonical_bytes().unwrap()
        );

        let mut changed = base.clone();
        changed.decision.risk_score = 9.9;
        assert_ne!(
            base.canonical_bytes().unwrap(),
            changed.canonical_bytes().unwrap()
        );

        let mut changed = base.clone();
        changed.decision.outcome = Outcome::Blocked;
        assert_ne!(
            base.canonical_bytes().unwrap(),
            changed.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn entry_round_trips_through_json() {
        let e = entry();
        let json = serde_json::to_string(&e).unwrap();
        let back: AuditLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
