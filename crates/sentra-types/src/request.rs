use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ids::{SystemId, TenantId};

/// Kind of artifact the action would produce or touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Text,
    Code,
    Image,
    Audio,
    StructuredData,
}

/// Upper bound on prompt payload size. Larger prompts are rejected before
/// the pipeline runs rather than fed to the detectors.
pub const PROMPT_MAX_BYTES: usize = 64 * 1024;

/// One action request entering the enforcement pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnforceRequest {
    pub system_id: SystemId,
    pub tenant_id: TenantId,
    pub prompt: String,
    pub environment: String,
    pub artifact_type: ArtifactType,
}

impl EnforceRequest {
    pub fn new(
        system_id: SystemId,
        tenant_id: TenantId,
        prompt: impl Into<String>,
        environment: impl Into<String>,
        artifact_type: ArtifactType,
    ) -> Self {
        Self {
            system_id,
            tenant_id,
            prompt: prompt.into(),
            environment: environment.into(),
            artifact_type,
        }
    }

    /// Reject malformed requests before the pipeline runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.environment.trim().is_empty() {
            return Err(ValidationError::MissingField("environment"));
        }
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::MissingField("prompt"));
        }
        if self.prompt.len() > PROMPT_MAX_BYTES {
            return Err(ValidationError::MalformedField {
                field: "prompt",
                reason: format!(
                    "{} bytes exceeds the {PROMPT_MAX_BYTES}-byte limit",
                    self.prompt.len()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, environment: &str) -> EnforceRequest {
        EnforceRequest::new(
            SystemId::new(),
            TenantId::new(),
            prompt,
            environment,
            ArtifactType::Text,
        )
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("hello", "production").validate().is_ok());
    }

    #[test]
    fn empty_environment_rejected() {
        let err = request("hello", "  ").validate().unwrap_err();
        assert!(matches!(err, ValidationError::MissingField("environment")));
    }

    #[test]
    fn empty_prompt_rejected() {
        let err = request("", "production").validate().unwrap_err();
        assert!(matches!(err, ValidationError::MissingField("prompt")));
    }

    #[test]
    fn oversized_prompt_rejected() {
        let oversized = "a".repeat(PROMPT_MAX_BYTES + 1);
        let err = request(&oversized, "production").validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MalformedField { field: "prompt", .. }
        ));

        let at_limit = "a".repeat(PROMPT_MAX_BYTES);
        assert!(request(&at_limit, "production").validate().is_ok());
    }
}
