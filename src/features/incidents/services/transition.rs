//! Status transition guard for the incident lifecycle.
//!
//! The allowed-edge set is deliberately small:
//!
//! ```text
//! open ──> investigating ──> resolved
//!   └────────────────────────^    │
//!              investigating <────┘
//! ```
//!
//! `closed` exists as a status value but has no inbound or outbound edge in
//! the current product rules, so it is unreachable here on purpose.

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::IncidentStatus;

/// Legal targets for a given current status. Exhaustive on purpose: adding a
/// status variant forces a decision here.
pub fn allowed_targets(current: IncidentStatus) -> &'static [IncidentStatus] {
    match current {
        IncidentStatus::Open => &[IncidentStatus::Investigating, IncidentStatus::Resolved],
        IncidentStatus::Investigating => &[IncidentStatus::Resolved],
        IncidentStatus::Resolved => &[IncidentStatus::Investigating],
        IncidentStatus::Closed => &[],
    }
}

/// Checks that `requested` is a legal transition from `current`.
///
/// Pure; must run before any status mutation is persisted.
pub fn check_transition(current: IncidentStatus, requested: IncidentStatus) -> Result<()> {
    if allowed_targets(current).contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Cannot transition incident from {} to {}",
            current, requested
        )))
    }
}

/// Whether entering `target` stamps `resolved_at`/`resolved_by`.
///
/// The stamping applies both to `resolved` and to (re-)entering
/// `investigating` - observed product behavior, kept as-is.
pub fn stamps_resolution(target: IncidentStatus) -> bool {
    matches!(
        target,
        IncidentStatus::Investigating | IncidentStatus::Resolved
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use IncidentStatus::*;

    const ALL: [IncidentStatus; 4] = [Open, Investigating, Resolved, Closed];

    fn is_allowed(current: IncidentStatus, requested: IncidentStatus) -> bool {
        matches!(
            (current, requested),
            (Open, Investigating) | (Open, Resolved) | (Investigating, Resolved) | (Resolved, Investigating)
        )
    }

    #[test]
    fn full_transition_matrix() {
        for current in ALL {
            for requested in ALL {
                let result = check_transition(current, requested);
                if is_allowed(current, requested) {
                    assert!(result.is_ok(), "{} -> {} should be legal", current, requested);
                } else {
                    assert!(
                        matches!(result, Err(AppError::Forbidden(_))),
                        "{} -> {} should be forbidden",
                        current,
                        requested
                    );
                }
            }
        }
    }

    #[test]
    fn closed_is_unreachable() {
        for current in ALL {
            assert!(check_transition(current, Closed).is_err());
        }
        for requested in ALL {
            assert!(check_transition(Closed, requested).is_err());
        }
    }

    #[test]
    fn forbidden_error_names_both_states() {
        let err = check_transition(Closed, Open).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("closed"));
        assert!(msg.contains("open"));
    }

    #[test]
    fn resolution_stamp_covers_investigating_and_resolved() {
        assert!(stamps_resolution(Investigating));
        assert!(stamps_resolution(Resolved));
        assert!(!stamps_resolution(Open));
        assert!(!stamps_resolution(Closed));
    }
}
