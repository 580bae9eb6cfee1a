use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use sentra_ledger::Ledger;
use sentra_policy::{resolve, EffectivePolicy};
use sentra_regulatory::RegulatorySource;
use sentra_threat::{
    aggregate, classify, ClassifyInput, RiskAssessment, WeightProfile, MAX_RISK_SCORE,
};
use sentra_types::{
    AiSystem, AuditStatus, DecisionReason, EnforceRequest, EnforcementDecision, Operator,
    OperationalStatus, Outcome, PolicyScope, RegulatoryImpact, StatusChangeRecord, SystemId,
    TenantId, ThreatSignal,
};

use crate::error::EngineError;
use crate::registry::Registry;

/// Engine tuning knobs. The defaults are the shipped configuration;
/// deployments override per environment.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Budget for registry lookups. Exceeding it fails closed: the caller
    /// sees the same `NotFound` as for an absent system.
    pub registry_timeout: Duration,
    /// Budget for the inline audit append. Exceeding it does not block the
    /// decision; the record is marked pending instead.
    pub audit_timeout: Duration,
    /// Score at or above which an over-limit request is blocked outright
    /// instead of escalated.
    pub hard_block_threshold: f64,
    pub weight_profile: WeightProfile,
    /// Deployment-wide policy scope, merged most-restrictive-wins with
    /// tenant and system scopes.
    pub global_policy: PolicyScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_timeout: Duration::from_secs(2),
            audit_timeout: Duration::from_secs(2),
            hard_block_threshold: 8.5,
            weight_profile: WeightProfile::default(),
            global_policy: PolicyScope::new(),
        }
    }
}

/// The staged enforcement pipeline.
///
/// Stage order is fixed: kill-switch check, policy resolution, threat
/// classification, risk aggregation, decision, audit. The kill switch is
/// checked against the registry's current record on every call, so an
/// engaged stop takes effect immediately and is never cleared by the
/// pipeline itself.
pub struct EnforcementEngine {
    registry: Arc<dyn Registry>,
    regulatory: Arc<dyn RegulatorySource>,
    ledger: Ledger,
    config: EngineConfig,
}

impl EnforcementEngine {
    pub fn new(
        registry: Arc<dyn Registry>,
        regulatory: Arc<dyn RegulatorySource>,
        ledger: Ledger,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            regulatory,
            ledger,
            config,
        }
    }

    /// Run one request through the full pipeline.
    ///
    /// Every decision, including kill-switch blocks, is audited. Infra
    /// faults fail closed except the audit append itself, which degrades
    /// to a pending record rather than taking enforcement down with it.
    pub async fn enforce(
        &self,
        request: &EnforceRequest,
    ) -> Result<EnforcementDecision, EngineError> {
        request.validate()?;

        let system = self
            .timed_registry(self.registry.get_system(request.system_id, request.tenant_id))
            .await?;

        if system.operational_status.blocks_enforcement() {
            let decision = self.blocked_by_status(&system);
            info!(
                system_id = %system.id,
                status = %system.operational_status,
                outcome = %decision.outcome,
                "enforcement short-circuited by operational status"
            );
            return Ok(self.audit(request, decision).await);
        }

        let tenant_policy = self
            .timed_registry(self.registry.get_tenant_policy(request.tenant_id))
            .await?;
        let effective = resolve(
            &self.config.global_policy,
            &tenant_policy,
            system.policy_override.as_ref(),
            &request.environment,
        );

        let input = ClassifyInput {
            prompt: &request.prompt,
            sector: system.sector,
            risk_classification: system.risk_classification,
            artifact_type: request.artifact_type,
            jurisdiction: system.jurisdiction,
            logging_enabled: system.logging_enabled,
            training_flops: system.training_flops,
        };
        let signals = classify(&input);
        let assessment = aggregate(
            &signals,
            &self.config.weight_profile,
            system.sector.has_validated_patterns(),
        );

        let (outcome, reason) = self.decide(&system, &effective, &signals, &assessment);
        let regulatory_impact = self.regulatory_impact(&system, &signals).await;
        let recommendations = build_recommendations(&system, &effective, &signals, outcome);

        let decision = EnforcementDecision {
            id: Uuid::new_v4(),
            outcome,
            reason,
            risk_score: assessment.score,
            confidence: assessment.confidence,
            threats: ranked_sub_threats(&signals),
            recommendations,
            controls_applied: full_pipeline_controls(),
            regulatory_impact,
            audit_status: AuditStatus::Recorded,
            decided_at: Utc::now(),
        };

        info!(
            system_id = %system.id,
            environment = %request.environment,
            outcome = %decision.outcome,
            reason = decision.reason.as_str(),
            risk_score = decision.risk_score,
            confidence = decision.confidence,
            "enforcement decision"
        );

        Ok(self.audit(request, decision).await)
    }

    /// Change a system's operational status. Engaging the kill switch goes
    /// through here like any other transition; clearing it is restricted
    /// to administrators and never happens implicitly.
    pub async fn set_operational_status(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
        target: OperationalStatus,
        reason: &str,
        operator: &Operator,
    ) -> Result<StatusChangeRecord, EngineError> {
        self.timed_registry(self.registry.update_operational_status(
            system_id, tenant_id, target, reason, operator,
        ))
        .await
    }

    /// Re-verify every audit record against its signature.
    pub async fn verify_audit_trail(&self) -> Result<u64, EngineError> {
        Ok(self.ledger.verify_all().await?)
    }

    async fn timed_registry<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        match timeout(self.config.registry_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("registry call exceeded budget, failing closed");
                Err(EngineError::NotFound)
            }
        }
    }

    fn blocked_by_status(&self, system: &AiSystem) -> EnforcementDecision {
        let reason = match system.operational_status {
            OperationalStatus::EmergencyStop => DecisionReason::KillSwitchActive,
            _ => DecisionReason::SystemSuspended,
        };
        EnforcementDecision {
            id: Uuid::new_v4(),
            outcome: Outcome::Blocked,
            reason,
            risk_score: 10.0,
            confidence: 1.0,
            threats: Vec::new(),
            recommendations: Vec::new(),
            controls_applied: vec!["kill_switch_check".into(), "audit_logging".into()],
            regulatory_impact: None,
            audit_status: AuditStatus::Recorded,
            decided_at: Utc::now(),
        }
    }

    fn decide(
        &self,
        system: &AiSystem,
        effective: &EffectivePolicy,
        signals: &[ThreatSignal],
        assessment: &RiskAssessment,
    ) -> (Outcome, DecisionReason) {
        if signals.iter().any(|s| s.prohibited) {
            return (Outcome::Blocked, DecisionReason::ProhibitedPractice);
        }

        // A score at the absolute ceiling that reaches the effective limit
        // is immediate severity; there is nothing left to escalate.
        if assessment.score >= MAX_RISK_SCORE
            && effective.limit.map_or(true, |limit| assessment.score >= limit)
        {
            return (Outcome::Blocked, DecisionReason::RiskLimitExceeded);
        }

        let oversight =
            system.human_oversight_required || effective.flags.require_human_oversight;

        match effective.limit {
            Some(limit) if assessment.score > limit => {
                if assessment.score >= self.config.hard_block_threshold {
                    (Outcome::Blocked, DecisionReason::RiskLimitExceeded)
                } else if oversight {
                    (Outcome::Escalate, DecisionReason::EscalatedForReview)
                } else {
                    // Over the limit with nobody to review it: block.
                    (Outcome::Blocked, DecisionReason::RiskLimitExceeded)
                }
            }
            Some(_) => (Outcome::Allowed, DecisionReason::WithinPolicy),
            None => {
                // No scope defined a ceiling; only hard rules apply.
                if assessment.score >= self.config.hard_block_threshold {
                    (Outcome::Blocked, DecisionReason::RiskLimitExceeded)
                } else {
                    (Outcome::Allowed, DecisionReason::PolicyUndefined)
                }
            }
        }
    }

    /// First known regulation mapping among the detected signals, highest
    /// contribution first. A source with partial coverage still surfaces
    /// the mapping of a lower-ranked signal.
    async fn regulatory_impact(
        &self,
        system: &AiSystem,
        signals: &[ThreatSignal],
    ) -> Option<RegulatoryImpact> {
        let mut ranked: Vec<&ThreatSignal> = signals.iter().collect();
        ranked.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

        for signal in ranked {
            match self
                .regulatory
                .lookup_penalty(signal.sub_threat, system.jurisdiction)
                .await
            {
                Ok(Some(entry)) => {
                    return Some(RegulatoryImpact {
                        jurisdiction: entry.jurisdiction,
                        article: entry.article,
                        penalty_range: entry.penalty_range,
                    })
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        sub_threat = %signal.sub_threat,
                        error = %err,
                        "regulatory lookup failed, skipping signal"
                    );
                }
            }
        }
        None
    }

    /// Append the decision to the ledger within the audit budget. A failed
    /// or late append degrades the returned record to pending instead of
    /// failing the decision.
    async fn audit(
        &self,
        request: &EnforceRequest,
        mut decision: EnforcementDecision,
    ) -> EnforcementDecision {
        let append = self.ledger.append(
            request.system_id,
            request.tenant_id,
            &request.environment,
            &decision,
        );
        match timeout(self.config.audit_timeout, append).await {
            Ok(Ok(_)) => decision,
            Ok(Err(err)) => {
                warn!(
                    decision_id = %decision.id,
                    error = %err,
                    "audit append failed, decision marked pending"
                );
                decision.audit_status = AuditStatus::Pending;
                decision
            }
            Err(_) => {
                warn!(
                    decision_id = %decision.id,
                    "audit append exceeded budget, decision marked pending"
                );
                decision.audit_status = AuditStatus::Pending;
                decision
            }
        }
    }
}

/// Sub-threat tags ordered by contribution, highest first, deduplicated.
fn ranked_sub_threats(signals: &[ThreatSignal]) -> Vec<sentra_types::SubThreat> {
    let mut ranked: Vec<&ThreatSignal> = signals.iter().collect();
    ranked.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    let mut tags = Vec::new();
    for signal in ranked {
        if !tags.contains(&signal.sub_threat) {
            tags.push(signal.sub_threat);
        }
    }
    tags
}

fn full_pipeline_controls() -> Vec<String> {
    [
        "kill_switch_check",
        "policy_resolution",
        "threat_classification",
        "risk_aggregation",
        "audit_logging",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Non-blocking monitoring suggestions. Only allowed requests carry
/// per-signal suggestions; policy-flag gaps are surfaced regardless.
fn build_recommendations(
    system: &AiSystem,
    effective: &EffectivePolicy,
    signals: &[ThreatSignal],
    outcome: Outcome,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if outcome == Outcome::Allowed {
        for signal in signals {
            if signal.contribution > 0.0 {
                recommendations.push(format!("monitor {}: {}", signal.sub_threat, signal.evidence));
            }
        }
    }

    if effective.flags.require_logging && !system.logging_enabled {
        recommendations
            .push("enable logging: effective policy requires logging capability".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_types::{SubThreat, ThreatCategory};

    fn signal(sub_threat: SubThreat, contribution: f64) -> ThreatSignal {
        ThreatSignal::new(ThreatCategory::Misuse, sub_threat, contribution, "test")
    }

    #[test]
    fn sub_threats_ranked_by_contribution() {
        let signals = vec![
            signal(SubThreat::LoggingGap, 2.0),
            signal(SubThreat::PromptInjection, 9.0),
            signal(SubThreat::DataExfiltration, 8.0),
        ];
        let ranked = ranked_sub_threats(&signals);
        assert_eq!(
            ranked,
            vec![
                SubThreat::PromptInjection,
                SubThreat::DataExfiltration,
                SubThreat::LoggingGap
            ]
        );
    }

    #[test]
    fn duplicate_sub_threats_collapse() {
        let signals = vec![
            signal(SubThreat::UnreliableOutput, 5.0),
            signal(SubThreat::UnreliableOutput, 4.0),
        ];
        assert_eq!(ranked_sub_threats(&signals).len(), 1);
    }
}
