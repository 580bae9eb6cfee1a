use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use sentra_types::{Jurisdiction, SubThreat};

use crate::table::{BuiltinPenaltyTable, PenaltyEntry};

/// Failure modes of a regulatory data source.
#[derive(Error, Debug)]
pub enum RegulatoryError {
    #[error("regulatory data source unavailable: {0}")]
    Unavailable(String),
}

/// A provider of regulation/penalty mappings.
#[async_trait]
pub trait RegulatorySource: Send + Sync {
    /// Penalty entry for a sub-threat under a jurisdiction, if one is
    /// known. `None` means "no validated mapping", not an error.
    async fn lookup_penalty(
        &self,
        sub_threat: SubThreat,
        jurisdiction: Jurisdiction,
    ) -> Result<Option<PenaltyEntry>, RegulatoryError>;
}

#[async_trait]
impl RegulatorySource for BuiltinPenaltyTable {
    async fn lookup_penalty(
        &self,
        sub_threat: SubThreat,
        jurisdiction: Jurisdiction,
    ) -> Result<Option<PenaltyEntry>, RegulatoryError> {
        Ok(self.lookup(sub_threat, jurisdiction))
    }
}

/// Lookup that prefers an external source and falls back to the built-in
/// table when the external source is absent or failing.
///
/// External unavailability is deliberately non-fatal: the decision
/// pipeline proceeds on the conservative default table and the condition
/// is logged for operators.
pub struct FallbackSource {
    external: Option<Arc<dyn RegulatorySource>>,
    builtin: BuiltinPenaltyTable,
}

impl FallbackSource {
    pub fn builtin_only() -> Self {
        Self {
            external: None,
            builtin: BuiltinPenaltyTable,
        }
    }

    pub fn with_external(external: Arc<dyn RegulatorySource>) -> Self {
        Self {
            external: Some(external),
            builtin: BuiltinPenaltyTable,
        }
    }
}

#[async_trait]
impl RegulatorySource for FallbackSource {
    async fn lookup_penalty(
        &self,
        sub_threat: SubThreat,
        jurisdiction: Jurisdiction,
    ) -> Result<Option<PenaltyEntry>, RegulatoryError> {
        if let Some(external) = &self.external {
            match external.lookup_penalty(sub_threat, jurisdiction).await {
                Ok(entry) => return Ok(entry),
                Err(err) => {
                    warn!(
                        sub_threat = %sub_threat,
                        error = %err,
                        "external regulatory source failed, using built-in table"
                    );
                }
            }
        }
        Ok(self.builtin.lookup(sub_threat, jurisdiction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    #[async_trait]
    impl RegulatorySource for FailingSource {
        async fn lookup_penalty(
            &self,
            _sub_threat: SubThreat,
            _jurisdiction: Jurisdiction,
        ) -> Result<Option<PenaltyEntry>, RegulatoryError> {
            Err(RegulatoryError::Unavailable("connection refused".into()))
        }
    }

    struct OverridingSource;

    #[async_trait]
    impl RegulatorySource for OverridingSource {
        async fn lookup_penalty(
            &self,
            _sub_threat: SubThreat,
            jurisdiction: Jurisdiction,
        ) -> Result<Option<PenaltyEntry>, RegulatoryError> {
            Ok(Some(PenaltyEntry {
                jurisdiction: jurisdiction.as_str().to_string(),
                article: "External Art. 1".into(),
                penalty_range: "external range".into(),
            }))
        }
    }

    #[tokio::test]
    async fn builtin_only_serves_the_table() {
        let source = FallbackSource::builtin_only();
        let entry = source
            .lookup_penalty(SubThreat::SocialScoring, Jurisdiction::Eu)
            .await
            .unwrap();
        assert!(entry.unwrap().article.contains("Art. 5"));
    }

    #[tokio::test]
    async fn external_failure_falls_back_to_builtin() {
        let source = FallbackSource::with_external(Arc::new(FailingSource));
        let entry = source
            .lookup_penalty(SubThreat::PromptInjection, Jurisdiction::Eu)
            .await
            .unwrap();
        assert!(entry.unwrap().article.contains("Art. 15"));
    }

    #[tokio::test]
    async fn healthy_external_source_wins() {
        let source = FallbackSource::with_external(Arc::new(OverridingSource));
        let entry = source
            .lookup_penalty(SubThreat::PromptInjection, Jurisdiction::Eu)
            .await
            .unwrap();
        assert_eq!(entry.unwrap().article, "External Art. 1");
    }
}
