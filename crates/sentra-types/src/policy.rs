use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Boolean policy rules where "true" is the restrictive setting.
///
/// Merge semantics: any scope setting a flag restrictive wins (logical OR
/// of restriction), so a tenant cannot relax what the global scope set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Block calls originating from public API surfaces.
    pub block_public_api: bool,
    /// Require human review when risk exceeds the effective limit.
    pub require_human_oversight: bool,
    /// Require the system's logging capability to be enabled.
    pub require_logging: bool,
}

impl PolicyFlags {
    /// Combine two flag sets, restriction wins.
    pub fn or(self, other: PolicyFlags) -> PolicyFlags {
        PolicyFlags {
            block_public_api: self.block_public_api || other.block_public_api,
            require_human_oversight: self.require_human_oversight
                || other.require_human_oversight,
            require_logging: self.require_logging || other.require_logging,
        }
    }
}

/// One policy scope (global, tenant, or system): per-environment risk
/// limits plus flag rules. Immutable value object — resolution never
/// mutates scopes, it derives an effective policy from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyScope {
    /// Maximum permitted risk score per environment name. An environment
    /// absent from every scope has no technical ceiling.
    pub env_limits: BTreeMap<String, f64>,
    pub flags: PolicyFlags,
}

impl PolicyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the risk limit for an environment.
    pub fn with_limit(mut self, environment: impl Into<String>, limit: f64) -> Self {
        self.env_limits.insert(environment.into(), limit);
        self
    }

    pub fn with_flags(mut self, flags: PolicyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The limit this scope defines for an environment, if any.
    pub fn limit_for(&self, environment: &str) -> Option<f64> {
        self.env_limits.get(environment).copied()
    }
}
