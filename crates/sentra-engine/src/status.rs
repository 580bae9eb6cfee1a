use sentra_types::{Operator, OperationalStatus, OperatorRole};

use crate::error::EngineError;

/// Validate one operational-status transition.
///
/// Any state may move to any other state, including `EmergencyStop` — the
/// kill switch is reachable from everywhere. Leaving `EmergencyStop` is
/// the one privileged edge: it never happens automatically and requires an
/// administrator. All other transitions require at least the operator
/// role; viewers can change nothing.
pub fn validate_transition(
    current: OperationalStatus,
    target: OperationalStatus,
    operator: &Operator,
) -> Result<(), EngineError> {
    if current == target {
        return Err(EngineError::InvalidTransition {
            from: current,
            to: target,
            detail: "status unchanged".into(),
        });
    }

    let required = if current == OperationalStatus::EmergencyStop {
        OperatorRole::Admin
    } else {
        OperatorRole::Operator
    };

    if operator.role < required {
        return Err(EngineError::Unauthorized {
            operator_id: operator.id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(role: OperatorRole) -> Operator {
        Operator::new("op-1", role)
    }

    #[test]
    fn operator_can_engage_kill_switch() {
        validate_transition(
            OperationalStatus::Active,
            OperationalStatus::EmergencyStop,
            &operator(OperatorRole::Operator),
        )
        .unwrap();
    }

    #[test]
    fn leaving_emergency_stop_requires_admin() {
        let err = validate_transition(
            OperationalStatus::EmergencyStop,
            OperationalStatus::Active,
            &operator(OperatorRole::Operator),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));

        validate_transition(
            OperationalStatus::EmergencyStop,
            OperationalStatus::Active,
            &operator(OperatorRole::Admin),
        )
        .unwrap();
    }

    #[test]
    fn viewer_cannot_change_status() {
        let err = validate_transition(
            OperationalStatus::Active,
            OperationalStatus::Maintenance,
            &operator(OperatorRole::Viewer),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
    }

    #[test]
    fn no_op_transition_rejected() {
        let err = validate_transition(
            OperationalStatus::Active,
            OperationalStatus::Active,
            &operator(OperatorRole::Admin),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }
}
