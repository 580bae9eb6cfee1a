use serde::{Deserialize, Serialize};

/// Detector categories. Prevalence weighting is keyed by category:
/// detectors tuned to more prevalent threat classes contribute more to
/// the aggregated score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    /// Compute-scale thresholds, logging-capability gaps.
    Technical,
    /// Sector-specific prohibited-practice patterns.
    Regulatory,
    /// Deliberate-misuse indicators (injection, exfiltration).
    Misuse,
    /// Output-reliability concerns.
    UnreliableOutput,
    /// Content/ethical matchers (manipulation, discrimination proxies).
    Content,
}

impl ThreatCategory {
    pub const ALL: [ThreatCategory; 5] = [
        ThreatCategory::Technical,
        ThreatCategory::Regulatory,
        ThreatCategory::Misuse,
        ThreatCategory::UnreliableOutput,
        ThreatCategory::Content,
    ];
}

/// Fine-grained tag identifying the specific manner of risk detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubThreat {
    PromptInjection,
    SocialScoring,
    BiometricCategorization,
    ProxyDiscrimination,
    DataExfiltration,
    ModelInversion,
    ManipulativeDesign,
    SystemicCapability,
    LoggingGap,
    UnreliableOutput,
}

impl SubThreat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubThreat::PromptInjection => "prompt_injection",
            SubThreat::SocialScoring => "social_scoring",
            SubThreat::BiometricCategorization => "biometric_categorization",
            SubThreat::ProxyDiscrimination => "proxy_discrimination",
            SubThreat::DataExfiltration => "data_exfiltration",
            SubThreat::ModelInversion => "model_inversion",
            SubThreat::ManipulativeDesign => "manipulative_design",
            SubThreat::SystemicCapability => "systemic_capability",
            SubThreat::LoggingGap => "logging_gap",
            SubThreat::UnreliableOutput => "unreliable_output",
        }
    }
}

impl std::fmt::Display for SubThreat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detector output.
///
/// Detectors are side-effect-free: a signal is evidence, not a decision.
/// `prohibited` marks signals matching an enumerated hard-prohibited
/// category for the applicable jurisdiction; the aggregator never averages
/// those down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreatSignal {
    pub category: ThreatCategory,
    pub sub_threat: SubThreat,
    /// Contribution to the risk score, in [0, 10] before weighting.
    pub contribution: f64,
    /// Regulation reference for downstream reporting, if known.
    pub regulation_ref: Option<String>,
    /// Per-signal confidence, if the detector reports one.
    pub confidence: Option<f64>,
    pub prohibited: bool,
    /// Short human-readable evidence note.
    pub evidence: String,
}

impl ThreatSignal {
    pub fn new(
        category: ThreatCategory,
        sub_threat: SubThreat,
        contribution: f64,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            category,
            sub_threat,
            contribution,
            regulation_ref: None,
            confidence: None,
            prohibited: false,
            evidence: evidence.into(),
        }
    }

    pub fn prohibited(mut self) -> Self {
        self.prohibited = true;
        self
    }

    pub fn with_regulation_ref(mut self, reference: impl Into<String>) -> Self {
        self.regulation_ref = Some(reference.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_threat_tags_are_snake_case() {
        assert_eq!(SubThreat::PromptInjection.as_str(), "prompt_injection");
        assert_eq!(
            serde_json::to_string(&SubThreat::ProxyDiscrimination).unwrap(),
            "\"proxy_discrimination\""
        );
    }

    #[test]
    fn signal_builder_sets_flags() {
        let signal = ThreatSignal::new(
            ThreatCategory::Regulatory,
            SubThreat::SocialScoring,
            10.0,
            "social scoring pattern",
        )
        .prohibited()
        .with_regulation_ref("EU AI Act Art. 5");

        assert!(signal.prohibited);
        assert_eq!(signal.regulation_ref.as_deref(), Some("EU AI Act Art. 5"));
    }
}
