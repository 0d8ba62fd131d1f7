//! Role views: one dashboard variant per role, re-derived from fresh queries on every call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::identity::{Actor, Role};
use crate::profiles::repository::ProfileRepository;
use crate::profiles::ProfileService;
use crate::reports::{self, ClientStats, PlatformStats, SpecialistStats};
use crate::requests::repository::RequestRepository;
use crate::requests::{RequestService, ServiceRequest};

#[derive(Debug, Clone, Serialize)]
pub struct ClientDashboard {
    pub stats: ClientStats,
    pub requests: Vec<ServiceRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialistDashboard {
    pub stats: SpecialistStats,
    pub available: Vec<ServiceRequest>,
    pub my_jobs: Vec<ServiceRequest>,
}

/// A recent request with the posting client's name.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub request: ServiceRequest,
    /// pt-BR label for `status`, e.g. "Em Andamento".
    pub status_label: &'static str,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub stats: PlatformStats,
    pub recent: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Client(ClientDashboard),
    Specialist(SpecialistDashboard),
    Admin(AdminDashboard),
}

pub struct DashboardService<R, P>
where
    R: RequestRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    requests: Arc<RequestService<R>>,
    profiles: Arc<ProfileService<P>>,
    recent_limit: u64,
}

impl<R, P> DashboardService<R, P>
where
    R: RequestRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub fn new(requests: Arc<RequestService<R>>, profiles: Arc<ProfileService<P>>, recent_limit: u64) -> Self {
        Self { requests, profiles, recent_limit }
    }

    /// Dashboard for whoever is calling, picked by role.
    #[instrument(skip(self, now), fields(actor_id = %actor.id, role = %actor.role))]
    pub async fn for_actor(&self, actor: &Actor, now: DateTime<Utc>) -> Result<Dashboard, ServiceError> {
        let view = match actor.role {
            Role::Client => Dashboard::Client(self.client(actor).await?),
            Role::Specialist => Dashboard::Specialist(self.specialist(actor).await?),
            Role::Admin => Dashboard::Admin(self.admin(actor, now).await?),
        };
        debug!("dashboard_built");
        Ok(view)
    }

    pub async fn client(&self, actor: &Actor) -> Result<ClientDashboard, ServiceError> {
        let requests = self.requests.client_requests(actor).await?;
        Ok(ClientDashboard { stats: reports::client_stats(&requests), requests })
    }

    pub async fn specialist(&self, actor: &Actor) -> Result<SpecialistDashboard, ServiceError> {
        let available = self.requests.open_pool(actor).await?;
        let my_jobs = self.requests.specialist_jobs(actor).await?;
        Ok(SpecialistDashboard { stats: reports::specialist_stats(&available, &my_jobs), available, my_jobs })
    }

    pub async fn admin(&self, actor: &Actor, now: DateTime<Utc>) -> Result<AdminDashboard, ServiceError> {
        Ok(AdminDashboard {
            stats: self.platform_stats(actor, now).await?,
            recent: self.recent_activity(actor).await?,
        })
    }

    /// Platform-wide aggregates. Admin only.
    pub async fn platform_stats(&self, actor: &Actor, now: DateTime<Utc>) -> Result<PlatformStats, ServiceError> {
        let requests = self.requests.snapshot(actor).await?;
        let profiles = self.profiles.list(actor).await?;
        Ok(reports::platform_stats(&profiles, &requests, now))
    }

    /// Newest requests joined with the client's full name. Admin only.
    pub async fn recent_activity(&self, actor: &Actor) -> Result<Vec<ActivityEntry>, ServiceError> {
        let recent = self.requests.recent(actor, self.recent_limit).await?;
        let names: HashMap<_, _> = self
            .profiles
            .all()
            .await?
            .into_iter()
            .map(|p| (p.id, p.full_name))
            .collect();
        Ok(recent
            .into_iter()
            .map(|request| {
                let client_name = names.get(&request.client_id).cloned();
                ActivityEntry { status_label: request.status.label(), request, client_name }
            })
            .collect())
    }

    pub async fn client_stats(&self, actor: &Actor) -> Result<ClientStats, ServiceError> {
        Ok(self.client(actor).await?.stats)
    }

    pub async fn specialist_stats(&self, actor: &Actor) -> Result<SpecialistStats, ServiceError> {
        Ok(self.specialist(actor).await?.stats)
    }
}
