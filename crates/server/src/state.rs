use std::sync::Arc;

use configs::{AuthConfig, MarketplaceConfig};
use service::profiles::repository::ProfileRepository;
use service::profiles::ProfileService;
use service::requests::repository::RequestRepository;
use service::requests::RequestService;
use service::views::DashboardService;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub leeway_secs: u64,
}

impl From<&AuthConfig> for ServerAuthConfig {
    fn from(cfg: &AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), leeway_secs: cfg.leeway_secs }
    }
}

/// Shared handler state. Repositories are trait objects so the same router runs
/// on Postgres in production and on in-memory stores in tests.
#[derive(Clone)]
pub struct ServerState {
    pub requests: Arc<RequestService<dyn RequestRepository>>,
    pub profiles: Arc<ProfileService<dyn ProfileRepository>>,
    pub dashboards: Arc<DashboardService<dyn RequestRepository, dyn ProfileRepository>>,
    pub auth: ServerAuthConfig,
    pub service_types: Arc<Vec<String>>,
}

impl ServerState {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        auth: ServerAuthConfig,
        marketplace: &MarketplaceConfig,
    ) -> Self {
        let requests = Arc::new(RequestService::new(request_repo));
        let profiles = Arc::new(ProfileService::new(profile_repo));
        let dashboards = Arc::new(DashboardService::new(
            requests.clone(),
            profiles.clone(),
            marketplace.recent_activity_limit,
        ));
        Self {
            requests,
            profiles,
            dashboards,
            auth,
            service_types: Arc::new(marketplace.service_types.clone()),
        }
    }
}
