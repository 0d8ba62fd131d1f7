//! Role-scoped authorization over service requests.
//!
//! Each role owns a fixed capability set; [`allowed`] is the single predicate every
//! read and every transition goes through before touching the store.

use serde::Serialize;

use super::domain::ServiceRequest;
use crate::identity::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SubmitRequest,
    ReadOwnRequests,
    CancelOwnRequests,
    BrowseOpenPool,
    ReadAssigned,
    ClaimRequests,
    CompleteAssigned,
    ReadEverything,
}

const CLIENT_CAPS: &[Capability] = &[
    Capability::SubmitRequest,
    Capability::ReadOwnRequests,
    Capability::CancelOwnRequests,
];

const SPECIALIST_CAPS: &[Capability] = &[
    Capability::BrowseOpenPool,
    Capability::ReadAssigned,
    Capability::ClaimRequests,
    Capability::CompleteAssigned,
];

const ADMIN_CAPS: &[Capability] = &[Capability::ReadEverything];

impl Role {
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Client => CLIENT_CAPS,
            Role::Specialist => SPECIALIST_CAPS,
            Role::Admin => ADMIN_CAPS,
        }
    }
}

impl Actor {
    pub fn can(&self, cap: Capability) -> bool {
        self.role.capabilities().contains(&cap)
    }
}

/// What an actor wants to do with an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Claim,
    Complete,
    Cancel,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Claim => "claim",
            Action::Complete => "complete",
            Action::Cancel => "cancel",
        }
    }
}

/// Submission has no target row yet, so it is checked on the actor alone.
pub fn may_submit(actor: &Actor) -> bool {
    actor.can(Capability::SubmitRequest)
}

/// Whether `actor` may perform `action` on `req`.
///
/// Claim only asks whether the role claims at all; whether the request is still open
/// is the state machine's call, so a lost race reports as a conflict instead of a denial.
/// Complete is denied when someone else holds the request.
pub fn allowed(actor: &Actor, action: Action, req: &ServiceRequest) -> bool {
    match action {
        Action::Read => {
            actor.can(Capability::ReadEverything)
                || (actor.can(Capability::ReadOwnRequests) && req.client_id == actor.id)
                || (actor.can(Capability::BrowseOpenPool) && req.is_open())
                || (actor.can(Capability::ReadAssigned) && req.specialist_id == Some(actor.id))
        }
        Action::Claim => actor.can(Capability::ClaimRequests),
        Action::Complete => {
            actor.can(Capability::CompleteAssigned)
                && req.specialist_id.map_or(true, |sid| sid == actor.id)
        }
        Action::Cancel => actor.can(Capability::CancelOwnRequests) && req.client_id == actor.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::domain::RequestStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn request(client: Uuid, specialist: Option<Uuid>, status: RequestStatus) -> ServiceRequest {
        let now = Utc::now();
        ServiceRequest {
            id: Uuid::new_v4(),
            client_id: client,
            specialist_id: specialist,
            service_type: "Encanador".into(),
            description: "Vazamento na pia".into(),
            location: "Rua B, 22".into(),
            price: Some(90.0),
            preferred_date: None,
            status,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[test]
    fn client_reads_and_cancels_only_own() {
        let a = Actor::new(Uuid::new_v4(), Role::Client);
        let b = Actor::new(Uuid::new_v4(), Role::Client);
        let req = request(a.id, None, RequestStatus::Pending);
        assert!(allowed(&a, Action::Read, &req));
        assert!(allowed(&a, Action::Cancel, &req));
        assert!(!allowed(&b, Action::Read, &req));
        assert!(!allowed(&b, Action::Cancel, &req));
        assert!(!allowed(&a, Action::Claim, &req));
        assert!(!allowed(&a, Action::Complete, &req));
    }

    #[test]
    fn specialist_sees_open_pool_and_own_jobs_only() {
        let s1 = Actor::new(Uuid::new_v4(), Role::Specialist);
        let s2 = Actor::new(Uuid::new_v4(), Role::Specialist);
        let client = Uuid::new_v4();

        let open = request(client, None, RequestStatus::Pending);
        assert!(allowed(&s1, Action::Read, &open));
        assert!(allowed(&s2, Action::Read, &open));

        let taken = request(client, Some(s1.id), RequestStatus::InProgress);
        assert!(allowed(&s1, Action::Read, &taken));
        assert!(!allowed(&s2, Action::Read, &taken));
        assert!(allowed(&s1, Action::Complete, &taken));
        assert!(!allowed(&s2, Action::Complete, &taken));
        assert!(!allowed(&s1, Action::Cancel, &open));
    }

    #[test]
    fn cancelled_request_leaves_specialist_view() {
        let s = Actor::new(Uuid::new_v4(), Role::Specialist);
        let req = request(Uuid::new_v4(), None, RequestStatus::Cancelled);
        assert!(!allowed(&s, Action::Read, &req));
    }

    #[test]
    fn admin_reads_everything_but_transitions_nothing() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let req = request(Uuid::new_v4(), Some(Uuid::new_v4()), RequestStatus::InProgress);
        assert!(allowed(&admin, Action::Read, &req));
        for action in [Action::Claim, Action::Complete, Action::Cancel] {
            assert!(!allowed(&admin, action, &req), "admin must not {}", action.as_str());
        }
        assert!(!may_submit(&admin));
    }

    #[test]
    fn only_clients_submit() {
        assert!(may_submit(&Actor::new(Uuid::new_v4(), Role::Client)));
        assert!(!may_submit(&Actor::new(Uuid::new_v4(), Role::Specialist)));
    }
}
