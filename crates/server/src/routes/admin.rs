use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use service::pagination::Pagination;
use service::profiles::Profile;
use service::reports::PlatformStats;
use service::requests::ServiceRequest;
use service::views::ActivityEntry;

use crate::{auth::CurrentActor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/admin/stats", tag = "admin",
    responses((status = 200, description = "Platform aggregates"), (status = 403, description = "Admins only"))
)]
pub async fn stats(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<PlatformStats>, JsonApiError> {
    Ok(Json(state.dashboards.platform_stats(&actor, Utc::now()).await?))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page, default 1
    pub page: Option<u32>,
    /// 1..=100, default 20
    pub per_page: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let d = Pagination::default();
        Pagination { page: q.page.unwrap_or(d.page), per_page: q.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(
    get, path = "/admin/requests", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "One page, newest first"), (status = 403, description = "Admins only"))
)]
pub async fn requests(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Query(q): Query<PageQuery>,
) -> Result<Json<Vec<ServiceRequest>>, JsonApiError> {
    let page = Pagination::from(q);
    let rows = state.requests.all_requests(&actor, page).await?;
    info!(count = rows.len(), page = page.page, "admin_list_requests");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/admin/activity", tag = "admin",
    responses((status = 200, description = "Newest requests with client names"), (status = 403, description = "Admins only"))
)]
pub async fn activity(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<ActivityEntry>>, JsonApiError> {
    Ok(Json(state.dashboards.recent_activity(&actor).await?))
}

#[utoipa::path(
    get, path = "/admin/profiles", tag = "admin",
    responses((status = 200, description = "Every profile"), (status = 403, description = "Admins only"))
)]
pub async fn profiles(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Profile>>, JsonApiError> {
    Ok(Json(state.profiles.list(&actor).await?))
}
