//! Shared data model for the Sentra governance engine.
//!
//! Everything that crosses a crate boundary lives here: identifiers,
//! tenant and system records, policy scopes, threat signals, enforcement
//! decisions, and the validation error taxonomy. All types are plain
//! values — behavior (resolution, classification, decision logic) lives
//! in the crates that consume them.

pub mod decision;
pub mod error;
pub mod ids;
pub mod policy;
pub mod request;
pub mod system;
pub mod threat;

pub use decision::{
    AuditStatus, DecisionReason, EnforcementDecision, Outcome, RegulatoryImpact,
    StatusChangeRecord,
};
pub use error::ValidationError;
pub use ids::{SystemId, TenantId};
pub use policy::{PolicyFlags, PolicyScope};
pub use request::{ArtifactType, EnforceRequest, PROMPT_MAX_BYTES};
pub use system::{
    AiSystem, Jurisdiction, LifecyclePhase, Operator, OperatorRole, OperationalStatus,
    RiskClassification, Sector, Tenant,
};
pub use threat::{SubThreat, ThreatCategory, ThreatSignal};
