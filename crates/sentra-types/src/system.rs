use serde::{Deserialize, Serialize};

use crate::ids::{SystemId, TenantId};
use crate::policy::PolicyScope;

/// Operational status of a registered AI system.
///
/// `EmergencyStop` is the kill switch: while set, every enforcement call
/// for the system resolves to `Blocked` before any classification runs.
/// It is never cleared automatically — leaving it requires an explicit
/// status update by an administrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalStatus {
    Active,
    Degraded,
    Maintenance,
    Suspended,
    EmergencyStop,
}

impl OperationalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalStatus::Active => "active",
            OperationalStatus::Degraded => "degraded",
            OperationalStatus::Maintenance => "maintenance",
            OperationalStatus::Suspended => "suspended",
            OperationalStatus::EmergencyStop => "emergency_stop",
        }
    }

    /// Whether this status halts enforcement outright.
    pub fn blocks_enforcement(&self) -> bool {
        matches!(
            self,
            OperationalStatus::EmergencyStop | OperationalStatus::Suspended
        )
    }
}

impl std::fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business sector a system operates in.
///
/// Sectors without validated detection patterns are marked experimental;
/// classification results for them carry a reduced confidence ceiling so
/// downstream consumers can flag them as less trustworthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Finance,
    Healthcare,
    CustomerService,
    LawEnforcement,
    Employment,
    Education,
    Media,
    General,
}

impl Sector {
    /// Sectors with validated detection patterns. Everything else is
    /// experimental coverage.
    pub fn has_validated_patterns(&self) -> bool {
        matches!(
            self,
            Sector::Finance
                | Sector::Healthcare
                | Sector::CustomerService
                | Sector::LawEnforcement
                | Sector::Employment
        )
    }
}

/// Declared risk classification for a system (registration-time claim).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClassification {
    Minimal,
    Limited,
    High,
    Unacceptable,
}

/// Lifecycle phase of a registered system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Development,
    Pilot,
    Production,
    Retired,
}

/// Jurisdiction a system is deployed under, for regulatory mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    Eu,
    Us,
    Uk,
    Global,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::Eu => "EU",
            Jurisdiction::Us => "US",
            Jurisdiction::Uk => "UK",
            Jurisdiction::Global => "GLOBAL",
        }
    }
}

/// Role of the operator performing an administrative action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorRole {
    Viewer,
    Operator,
    Admin,
}

/// Identity of the human (or service account) behind an admin operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub role: OperatorRole,
}

impl Operator {
    pub fn new(id: impl Into<String>, role: OperatorRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// An organization owning one or more AI systems.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// Tenant-scope policy: per-environment risk limits plus flag rules.
    pub policy: PolicyScope,
}

impl Tenant {
    pub fn new(name: impl Into<String>, policy: PolicyScope) -> Self {
        Self {
            id: TenantId::new(),
            name: name.into(),
            policy,
        }
    }
}

/// A registered AI system. Belongs to exactly one tenant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiSystem {
    pub id: SystemId,
    pub tenant_id: TenantId,
    pub name: String,
    pub sector: Sector,
    pub risk_classification: RiskClassification,
    pub lifecycle_phase: LifecyclePhase,
    pub operational_status: OperationalStatus,
    pub logging_enabled: bool,
    pub jurisdiction: Jurisdiction,
    /// Compute scale of the underlying model in training FLOPs, where
    /// declared. Used for systemic-risk thresholds.
    pub training_flops: Option<f64>,
    /// System-scope policy overrides, if any. Merged most-restrictive-wins
    /// with the tenant and global scopes.
    pub policy_override: Option<PolicyScope>,
    /// Whether escalation to a human reviewer is required when risk
    /// exceeds the effective limit without reaching the hard-block band.
    pub human_oversight_required: bool,
}
