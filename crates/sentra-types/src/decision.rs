use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::SystemId;
use crate::system::OperationalStatus;
use crate::threat::SubThreat;

/// Final outcome of one enforcement call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Allowed,
    Blocked,
    Escalate,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allowed => "ALLOWED",
            Outcome::Blocked => "BLOCKED",
            Outcome::Escalate => "ESCALATE",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the pipeline reached its outcome. Exposed verbatim at the boundary
/// and recorded in the audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    /// Kill switch engaged; classification was skipped entirely.
    KillSwitchActive,
    /// System administratively suspended.
    SystemSuspended,
    /// A hard-prohibited practice was detected.
    ProhibitedPractice,
    /// Risk score reached the hard-block band above the effective limit.
    RiskLimitExceeded,
    /// Risk exceeded the limit; routed to a human reviewer.
    EscalatedForReview,
    /// Risk within the effective policy limit.
    WithinPolicy,
    /// No scope defined a limit; only hard rules were applied.
    PolicyUndefined,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::KillSwitchActive => "KILL_SWITCH_ACTIVE",
            DecisionReason::SystemSuspended => "SYSTEM_SUSPENDED",
            DecisionReason::ProhibitedPractice => "PROHIBITED_PRACTICE",
            DecisionReason::RiskLimitExceeded => "RISK_LIMIT_EXCEEDED",
            DecisionReason::EscalatedForReview => "ESCALATED_FOR_REVIEW",
            DecisionReason::WithinPolicy => "WITHIN_POLICY",
            DecisionReason::PolicyUndefined => "POLICY_UNDEFINED",
        }
    }
}

/// Whether the decision's audit record made it to the ledger inline.
///
/// `Pending` means the append timed out or failed: the decision is still
/// valid and returned to the caller, but the record must be retried
/// out-of-band and the condition surfaced for alerting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Recorded,
    Pending,
}

/// Regulatory exposure attached when a detected sub-threat maps to a known
/// regulation/penalty table entry. Never fabricated: absence of a mapping
/// yields no summary at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryImpact {
    pub jurisdiction: String,
    pub article: String,
    pub penalty_range: String,
}

/// The full result of one enforcement call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnforcementDecision {
    pub id: Uuid,
    pub outcome: Outcome,
    pub reason: DecisionReason,
    /// Aggregated risk score, always in [0, 10].
    pub risk_score: f64,
    /// Confidence in the classification, always in [0, 1].
    pub confidence: f64,
    /// Detected sub-threats, ordered by contribution (highest first).
    pub threats: Vec<SubThreat>,
    /// Non-blocking monitoring suggestions, ordered as produced.
    pub recommendations: Vec<String>,
    /// Pipeline controls that ran for this call.
    pub controls_applied: Vec<String>,
    pub regulatory_impact: Option<RegulatoryImpact>,
    pub audit_status: AuditStatus,
    pub decided_at: DateTime<Utc>,
}

impl EnforcementDecision {
    pub fn is_blocked(&self) -> bool {
        self.outcome == Outcome::Blocked
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allowed
    }
}

/// Record of one operational-status transition. Kept as append-only
/// history alongside the current value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    pub id: Uuid,
    pub system_id: SystemId,
    pub from: OperationalStatus,
    pub to: OperationalStatus,
    pub reason: String,
    pub operator_id: String,
    pub changed_at: DateTime<Utc>,
}
