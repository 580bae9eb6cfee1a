use serde::{Deserialize, Serialize};
use tracing::warn;

use sentra_types::{ThreatCategory, ThreatSignal};

/// Risk score ceiling. Prohibited practices pin the score here.
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Confidence ceiling for sectors without validated detection patterns.
const EXPERIMENTAL_CONFIDENCE_CEILING: f64 = 0.65;

/// Prevalence multipliers per detector category.
///
/// The defaults are a starting profile, not a fixed rule table: operators
/// tune them as validated prevalence data changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub technical: f64,
    pub regulatory: f64,
    pub misuse: f64,
    pub unreliable_output: f64,
    pub content: f64,
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            technical: 1.1,
            regulatory: 1.3,
            misuse: 1.6,
            unreliable_output: 1.5,
            content: 1.2,
        }
    }
}

impl WeightProfile {
    pub fn weight(&self, category: ThreatCategory) -> f64 {
        match category {
            ThreatCategory::Technical => self.technical,
            ThreatCategory::Regulatory => self.regulatory,
            ThreatCategory::Misuse => self.misuse,
            ThreatCategory::UnreliableOutput => self.unreliable_output,
            ThreatCategory::Content => self.content,
        }
    }
}

/// Aggregated risk for one request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Always in [0, 10].
    pub score: f64,
    /// Always in [0, 1].
    pub confidence: f64,
}

/// Combine threat signals into one bounded score and confidence value.
///
/// Score is the weighted average of signal contributions, each scaled by
/// its category prevalence factor, clamped to [0, 10]. A prohibited
/// signal forces the score to the ceiling — prohibited practices are never
/// averaged down by low-risk signals. Confidence grows with the fraction
/// of detector categories that fired; sectors without validated patterns
/// (`validated_patterns == false`) cap it so downstream consumers can flag
/// the result as less trustworthy.
///
/// Faults fail closed: a non-finite contribution is treated as maximal
/// risk rather than being dropped.
pub fn aggregate(
    signals: &[ThreatSignal],
    profile: &WeightProfile,
    validated_patterns: bool,
) -> RiskAssessment {
    let prohibited = signals.iter().any(|s| s.prohibited);

    let score = if prohibited {
        MAX_RISK_SCORE
    } else if signals.is_empty() {
        0.0
    } else {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for signal in signals {
            let contribution = if signal.contribution.is_finite() {
                signal.contribution.clamp(0.0, MAX_RISK_SCORE)
            } else {
                warn!(
                    sub_threat = %signal.sub_threat,
                    "non-finite signal contribution, failing closed to maximum"
                );
                MAX_RISK_SCORE
            };
            let weight = profile.weight(signal.category);
            weighted_sum += contribution * weight;
            weight_sum += weight;
        }
        if weight_sum > 0.0 {
            (weighted_sum / weight_sum).clamp(0.0, MAX_RISK_SCORE)
        } else {
            // Zero or negative total weight means a misconfigured profile;
            // indeterminate aggregation fails closed.
            warn!("degenerate weight profile, failing closed to maximum score");
            MAX_RISK_SCORE
        }
    };

    let fired: usize = ThreatCategory::ALL
        .iter()
        .filter(|category| {
            signals
                .iter()
                .any(|s| s.category == **category && s.contribution > 0.0)
        })
        .count();
    let coverage = fired as f64 / ThreatCategory::ALL.len() as f64;
    let mut confidence = 0.4 + 0.6 * coverage;
    if !validated_patterns {
        confidence = confidence.min(EXPERIMENTAL_CONFIDENCE_CEILING);
    }

    RiskAssessment {
        score,
        confidence: confidence.clamp(0.0, 1.0),
    }
}
