use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use service::reports::{ClientStats, SpecialistStats};
use service::requests::query::StatusFilter;
use service::requests::ServiceRequest;
use service::views::Dashboard;

use crate::{auth::CurrentActor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/dashboard", tag = "views",
    responses(
        (status = 200, description = "Role-specific dashboard, tagged by `role`"),
        (status = 403, description = "Profile incomplete")
    )
)]
pub async fn dashboard(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Dashboard>, JsonApiError> {
    Ok(Json(state.dashboards.for_actor(&actor, Utc::now()).await?))
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ClientSearch {
    /// `all` or one of pending / in_progress / completed / cancelled
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub status: StatusFilter,
    /// Case-insensitive match on service type or description
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get, path = "/client/requests", tag = "views",
    params(ClientSearch),
    responses((status = 200, description = "Own requests, newest first"), (status = 403, description = "Clients only"))
)]
pub async fn client_requests(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Query(search): Query<ClientSearch>,
) -> Result<Json<Vec<ServiceRequest>>, JsonApiError> {
    let rows = state.requests.search_client_requests(&actor, search.status, &search.q).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/client/stats", tag = "views",
    responses((status = 200, description = "OK"), (status = 403, description = "Clients only"))
)]
pub async fn client_stats(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<ClientStats>, JsonApiError> {
    Ok(Json(state.dashboards.client_stats(&actor).await?))
}

#[utoipa::path(
    get, path = "/specialist/open", tag = "views",
    responses((status = 200, description = "Pending, unassigned requests"), (status = 403, description = "Specialists only"))
)]
pub async fn open_pool(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<ServiceRequest>>, JsonApiError> {
    Ok(Json(state.requests.open_pool(&actor).await?))
}

#[utoipa::path(
    get, path = "/specialist/jobs", tag = "views",
    responses((status = 200, description = "Requests assigned to caller"), (status = 403, description = "Specialists only"))
)]
pub async fn my_jobs(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<ServiceRequest>>, JsonApiError> {
    Ok(Json(state.requests.specialist_jobs(&actor).await?))
}

#[utoipa::path(
    get, path = "/specialist/stats", tag = "views",
    responses((status = 200, description = "OK"), (status = 403, description = "Specialists only"))
)]
pub async fn specialist_stats(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<SpecialistStats>, JsonApiError> {
    Ok(Json(state.dashboards.specialist_stats(&actor).await?))
}
