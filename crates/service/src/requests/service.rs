use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewServiceRequest, ServiceRequest};
use super::errors::RequestError;
use super::lifecycle::Transition;
use super::policy::{self, Action, Capability};
use super::query::{self, RequestQuery, StatusFilter};
use super::repository::RequestRepository;
use crate::identity::Actor;
use crate::pagination::Pagination;

/// Lifecycle operations on service requests, independent of web framework.
///
/// Every transition runs as: load, authorize, check the state machine, then a
/// conditional write. The write re-evaluates the guard, so two actors racing for
/// the same request get exactly one winner; the loser sees a conflict.
pub struct RequestService<R: RequestRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RequestRepository + ?Sized> RequestService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Post a new request as the calling client.
    ///
    /// # Examples
    /// ```
    /// use service::requests::{RequestService, NewServiceRequest, RequestStatus};
    /// use service::requests::repository::mock::MockRequestRepository;
    /// use service::{Actor, Role};
    /// use std::sync::Arc;
    /// let svc = RequestService::new(Arc::new(MockRequestRepository::default()));
    /// let client = Actor::new(uuid::Uuid::new_v4(), Role::Client);
    /// let input = NewServiceRequest {
    ///     service_type: "Eletricista".into(),
    ///     description: "Instalar chuveiro".into(),
    ///     location: "Rua A, 1".into(),
    ///     price: Some(150.0),
    ///     preferred_date: None,
    /// };
    /// let req = tokio_test::block_on(svc.submit(&client, input)).unwrap();
    /// assert_eq!(req.status, RequestStatus::Pending);
    /// assert_eq!(req.client_id, client.id);
    /// ```
    #[instrument(skip(self, input), fields(actor_id = %actor.id, role = %actor.role))]
    pub async fn submit(&self, actor: &Actor, input: NewServiceRequest) -> Result<ServiceRequest, RequestError> {
        if !policy::may_submit(actor) {
            warn!(actor_id = %actor.id, role = %actor.role, "submit_denied");
            return Err(RequestError::Forbidden("only clients can submit requests".into()));
        }
        let input = input.normalized()?;
        let req = self.repo.insert(actor.id, &input).await?;
        info!(request_id = %req.id, client_id = %req.client_id, service_type = %req.service_type, "request_submitted");
        Ok(req)
    }

    /// A single request, subject to read visibility.
    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<ServiceRequest, RequestError> {
        let req = self.repo.get(id).await?.ok_or(RequestError::NotFound)?;
        if !policy::allowed(actor, Action::Read, &req) {
            return Err(RequestError::Forbidden("request not visible to caller".into()));
        }
        Ok(req)
    }

    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn claim(&self, actor: &Actor, id: Uuid) -> Result<ServiceRequest, RequestError> {
        let req = self
            .transition(actor, id, Action::Claim, Transition::Claim { specialist_id: actor.id })
            .await?;
        info!(request_id = %req.id, specialist_id = %actor.id, "request_claimed");
        Ok(req)
    }

    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn complete(&self, actor: &Actor, id: Uuid) -> Result<ServiceRequest, RequestError> {
        let req = self
            .transition(actor, id, Action::Complete, Transition::Complete { specialist_id: actor.id })
            .await?;
        info!(request_id = %req.id, specialist_id = %actor.id, price = req.price_or_zero(), "request_completed");
        Ok(req)
    }

    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn cancel(&self, actor: &Actor, id: Uuid) -> Result<ServiceRequest, RequestError> {
        let req = self
            .transition(actor, id, Action::Cancel, Transition::Cancel { client_id: actor.id })
            .await?;
        info!(request_id = %req.id, client_id = %actor.id, "request_cancelled");
        Ok(req)
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: Uuid,
        action: Action,
        transition: Transition,
    ) -> Result<ServiceRequest, RequestError> {
        let current = self.repo.get(id).await?.ok_or(RequestError::NotFound)?;
        if !policy::allowed(actor, action, &current) {
            warn!(request_id = %id, actor_id = %actor.id, role = %actor.role, action = action.as_str(), "transition_denied");
            return Err(RequestError::Forbidden(format!(
                "{} may not {} this request",
                actor.role,
                action.as_str()
            )));
        }
        if let Err(e) = transition.check(&current) {
            warn!(request_id = %id, status = %current.status, action = action.as_str(), "transition_conflict");
            return Err(e);
        }
        match self.repo.apply_transition(id, &transition, Utc::now()).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!(request_id = %id, action = action.as_str(), "transition_lost_race");
                Err(RequestError::Conflict(format!(
                    "request changed before {} could apply",
                    transition.name()
                )))
            }
        }
    }

    fn require(actor: &Actor, cap: Capability) -> Result<(), RequestError> {
        if actor.can(cap) {
            Ok(())
        } else {
            Err(RequestError::Forbidden(format!("{} lacks {:?}", actor.role, cap)))
        }
    }

    /// The calling client's own requests, newest first.
    pub async fn client_requests(&self, actor: &Actor) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::ReadOwnRequests)?;
        self.repo.find(&RequestQuery::for_client(actor.id)).await
    }

    /// Client list narrowed by status and a free-text term.
    pub async fn search_client_requests(
        &self,
        actor: &Actor,
        status: StatusFilter,
        term: &str,
    ) -> Result<Vec<ServiceRequest>, RequestError> {
        let mine = self.client_requests(actor).await?;
        Ok(query::search(&mine, status, term))
    }

    /// Pending, unassigned requests any specialist may claim.
    pub async fn open_pool(&self, actor: &Actor) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::BrowseOpenPool)?;
        self.repo.find(&RequestQuery::open_pool()).await
    }

    /// Requests bound to the calling specialist, any status.
    pub async fn specialist_jobs(&self, actor: &Actor) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::ReadAssigned)?;
        self.repo.find(&RequestQuery::for_specialist(actor.id)).await
    }

    /// One page of every request, newest first. Admin only.
    pub async fn all_requests(&self, actor: &Actor, page: Pagination) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::ReadEverything)?;
        let (offset, limit) = page.offset_limit();
        self.repo.find(&RequestQuery::all().window(offset, limit)).await
    }

    /// The `limit` most recent requests. Admin only.
    pub async fn recent(&self, actor: &Actor, limit: u64) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::ReadEverything)?;
        self.repo.find(&RequestQuery::all().limit(limit)).await
    }

    /// Every request, for aggregation. Admin only.
    pub async fn snapshot(&self, actor: &Actor) -> Result<Vec<ServiceRequest>, RequestError> {
        Self::require(actor, Capability::ReadEverything)?;
        self.repo.find(&RequestQuery::all()).await
    }
}
