use serde::{Deserialize, Serialize};

use sentra_types::{Jurisdiction, SubThreat};

/// One row of the regulation/penalty table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyEntry {
    pub jurisdiction: String,
    pub article: String,
    pub penalty_range: String,
}

impl PenaltyEntry {
    fn new(jurisdiction: Jurisdiction, article: &str, penalty_range: &str) -> Self {
        Self {
            jurisdiction: jurisdiction.as_str().to_string(),
            article: article.to_string(),
            penalty_range: penalty_range.to_string(),
        }
    }
}

/// Compiled-in conservative default table.
///
/// EU AI Act mappings for the enumerated sub-threats. Jurisdictions the
/// table has no validated mapping for yield `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPenaltyTable;

const ART5_PENALTY: &str = "up to EUR 35M or 7% of global annual turnover";
const STANDARD_PENALTY: &str = "up to EUR 15M or 3% of global annual turnover";

impl BuiltinPenaltyTable {
    pub fn lookup(&self, sub_threat: SubThreat, jurisdiction: Jurisdiction) -> Option<PenaltyEntry> {
        // Only the EU mapping is validated today. Other jurisdictions fall
        // through to no mapping rather than guessing.
        if jurisdiction != Jurisdiction::Eu {
            return None;
        }

        let (article, penalty) = match sub_threat {
            SubThreat::SocialScoring => ("EU AI Act Art. 5(1)(c)", ART5_PENALTY),
            SubThreat::BiometricCategorization => ("EU AI Act Art. 5(1)(g)", ART5_PENALTY),
            SubThreat::ManipulativeDesign => ("EU AI Act Art. 5(1)(a)", ART5_PENALTY),
            SubThreat::ProxyDiscrimination => ("EU AI Act Art. 10", STANDARD_PENALTY),
            SubThreat::LoggingGap => ("EU AI Act Art. 12", STANDARD_PENALTY),
            SubThreat::PromptInjection => ("EU AI Act Art. 15", STANDARD_PENALTY),
            SubThreat::DataExfiltration => ("EU AI Act Art. 15", STANDARD_PENALTY),
            SubThreat::ModelInversion => ("EU AI Act Art. 15", STANDARD_PENALTY),
            SubThreat::UnreliableOutput => ("EU AI Act Art. 15", STANDARD_PENALTY),
            SubThreat::SystemicCapability => ("EU AI Act Art. 55", STANDARD_PENALTY),
        };

        Some(PenaltyEntry::new(jurisdiction, article, penalty))
    }
}
