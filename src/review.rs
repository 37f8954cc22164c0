//! Founder decisions on pending applications.

use tracing::{error, info};

use crate::dashboard::RecruiterDashboard;
use crate::error::ReviewError;
use crate::models::{Application, ApplicationStatus, Decision, InvestmentInterest, Submission};
use crate::repo::ApplicationStore;
use crate::store::DocumentStore;

/// Which application list a decision targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantKind {
    Developer,
    Investor,
}

/// Checks that `decision` is offered for `current` and returns the new status.
pub fn transition(current: ApplicationStatus, decision: Decision) -> Result<ApplicationStatus, ReviewError> {
    if current.decisions().contains(&decision) {
        Ok(decision.outcome())
    } else {
        Err(ReviewError::InvalidTransition {
            from: current,
            decision,
        })
    }
}

fn persist<S: Submission>(
    store: &dyn DocumentStore,
    id: &str,
    current: ApplicationStatus,
    decision: Decision,
) -> Result<ApplicationStatus, ReviewError> {
    let next = transition(current, decision)?;
    ApplicationStore::new(store)
        .update_status::<S>(id, next)
        .inspect_err(|e| error!(id, error = %e, "status update failed"))?;
    info!(id, status = %next, "application reviewed");
    Ok(next)
}

/// Applies a decision to one application on the dashboard.
///
/// The store write happens first; the in-memory view only changes once it
/// succeeds, so a failed write leaves the dashboard as it was.
pub fn decide(
    store: &dyn DocumentStore,
    dashboard: &mut RecruiterDashboard,
    kind: ApplicantKind,
    id: &str,
    decision: Decision,
) -> Result<ApplicationStatus, ReviewError> {
    match kind {
        ApplicantKind::Developer => {
            let view = dashboard
                .candidate_mut(id)
                .ok_or_else(|| ReviewError::UnknownApplication(id.to_string()))?;
            let next = persist::<Application>(store, id, view.status, decision)?;
            view.status = next;
            Ok(next)
        }
        ApplicantKind::Investor => {
            let view = dashboard
                .investor_mut(id)
                .ok_or_else(|| ReviewError::UnknownApplication(id.to_string()))?;
            let next = persist::<InvestmentInterest>(store, id, view.status, decision)?;
            view.status = next;
            Ok(next)
        }
    }
}
