//! Issue detection.
//!
//! Flags machines that need attention: no product, a loaner in production,
//! or an idle/decommissioned status.

use serde::Serialize;

use crate::store::models::{Environment, Machine, Status};

/// Tag marking a borrowed machine.
pub const LOANER_TAG: &str = "loaner";

/// Which issue rule fired for a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    Unassigned,
    LoanerInProd,
    Idle,
    Decommissioned,
}

/// Check if a machine matches the issue predicate.
pub fn has_issues(machine: &Machine) -> bool {
    machine.is_unassigned()
        || (machine.has_tag(LOANER_TAG) && machine.environment == Environment::Prod)
        || machine.status == Status::Decommissioned
        || machine.status == Status::Idle
}

/// List every issue rule that fires, in rule order.
pub fn issue_reasons(machine: &Machine) -> Vec<IssueKind> {
    let mut reasons = Vec::new();
    if machine.is_unassigned() {
        reasons.push(IssueKind::Unassigned);
    }
    if machine.has_tag(LOANER_TAG) && machine.environment == Environment::Prod {
        reasons.push(IssueKind::LoanerInProd);
    }
    match machine.status {
        Status::Idle => reasons.push(IssueKind::Idle),
        Status::Decommissioned => reasons.push(IssueKind::Decommissioned),
        Status::Active | Status::Inactive => {}
    }
    reasons
}
