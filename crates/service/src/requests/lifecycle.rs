//! Request status state machine.
//!
//! ```text
//! (submit) -> pending --claim--> in_progress --complete--> completed
//!                 \--cancel--> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Every transition carries a [`Guard`]
//! describing the row state it expects; stores apply the transition only if the
//! guard still holds at write time.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{RequestStatus, ServiceRequest};
use super::errors::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Specialist binds themself to an open request.
    Claim { specialist_id: Uuid },
    /// Bound specialist marks the work done.
    Complete { specialist_id: Uuid },
    /// Owning client withdraws a request nobody has claimed.
    Cancel { client_id: Uuid },
}

/// Expected `specialist_id` at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Unassigned,
    AssignedTo(Uuid),
}

/// Row state a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub status: RequestStatus,
    pub assignment: Assignment,
    pub client_id: Option<Uuid>,
}

impl Guard {
    pub fn holds(&self, req: &ServiceRequest) -> bool {
        let assignment_ok = match self.assignment {
            Assignment::Unassigned => req.specialist_id.is_none(),
            Assignment::AssignedTo(id) => req.specialist_id == Some(id),
        };
        req.status == self.status
            && assignment_ok
            && self.client_id.map_or(true, |cid| cid == req.client_id)
    }
}

impl Transition {
    pub const fn name(&self) -> &'static str {
        match self {
            Transition::Claim { .. } => "claim",
            Transition::Complete { .. } => "complete",
            Transition::Cancel { .. } => "cancel",
        }
    }

    pub const fn from_status(&self) -> RequestStatus {
        match self {
            Transition::Claim { .. } | Transition::Cancel { .. } => RequestStatus::Pending,
            Transition::Complete { .. } => RequestStatus::InProgress,
        }
    }

    pub const fn to_status(&self) -> RequestStatus {
        match self {
            Transition::Claim { .. } => RequestStatus::InProgress,
            Transition::Complete { .. } => RequestStatus::Completed,
            Transition::Cancel { .. } => RequestStatus::Cancelled,
        }
    }

    pub fn guard(&self) -> Guard {
        match *self {
            Transition::Claim { .. } => Guard {
                status: RequestStatus::Pending,
                assignment: Assignment::Unassigned,
                client_id: None,
            },
            Transition::Complete { specialist_id } => Guard {
                status: RequestStatus::InProgress,
                assignment: Assignment::AssignedTo(specialist_id),
                client_id: None,
            },
            Transition::Cancel { client_id } => Guard {
                status: RequestStatus::Pending,
                assignment: Assignment::Unassigned,
                client_id: Some(client_id),
            },
        }
    }

    /// Conflict unless the transition is defined from `req`'s current state.
    pub fn check(&self, req: &ServiceRequest) -> Result<(), RequestError> {
        if self.guard().holds(req) {
            return Ok(());
        }
        if req.status != self.from_status() {
            return Err(RequestError::Conflict(format!(
                "cannot {} a request that is {}",
                self.name(),
                req.status
            )));
        }
        Err(RequestError::Conflict(format!(
            "request {} no longer matches the expected assignment for {}",
            req.id,
            self.name()
        )))
    }

    /// Next snapshot after the transition, or a conflict if it is not defined from `req`.
    pub fn apply(&self, req: &ServiceRequest, at: DateTime<Utc>) -> Result<ServiceRequest, RequestError> {
        self.check(req)?;
        let mut next = req.clone();
        next.status = self.to_status();
        next.updated_at = at;
        match *self {
            Transition::Claim { specialist_id } => next.specialist_id = Some(specialist_id),
            Transition::Complete { .. } => next.completed_at = Some(at),
            Transition::Cancel { .. } => {}
        }
        Ok(next)
    }
}
