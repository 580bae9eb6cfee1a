use serde::{Deserialize, Serialize};

use sentra_types::{PolicyFlags, PolicyScope};

/// The resolved policy for one environment. Derived, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectivePolicy {
    pub environment: String,
    /// Most restrictive limit across all scopes that define one, or `None`
    /// when no scope defines a limit for the environment ("no technical
    /// ceiling" — hard rules still apply).
    pub limit: Option<f64>,
    pub flags: PolicyFlags,
}

impl EffectivePolicy {
    /// Whether any scope defined a limit for this environment.
    pub fn is_defined(&self) -> bool {
        self.limit.is_some()
    }
}

/// Merge the three policy scopes for one environment.
///
/// Total over all inputs: a missing system override is simply skipped, an
/// environment nobody mentions resolves to an undefined limit.
pub fn resolve(
    global: &PolicyScope,
    tenant: &PolicyScope,
    system: Option<&PolicyScope>,
    environment: &str,
) -> EffectivePolicy {
    let limits = [
        global.limit_for(environment),
        tenant.limit_for(environment),
        system.and_then(|s| s.limit_for(environment)),
    ];
    let limit = limits
        .into_iter()
        .flatten()
        .fold(None::<f64>, |acc, l| match acc {
            Some(current) => Some(current.min(l)),
            None => Some(l),
        });

    let mut flags = global.flags.or(tenant.flags);
    if let Some(system) = system {
        flags = flags.or(system.flags);
    }

    EffectivePolicy {
        environment: environment.to_string(),
        limit,
        flags,
    }
}
