use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use service::requests::{NewServiceRequest, ServiceRequest};

use crate::{auth::CurrentActor, errors::JsonApiError, state::ServerState};

#[utoipa::path(
    post, path = "/requests", tag = "requests",
    request_body = crate::openapi::NewServiceRequestDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Only clients submit")
    )
)]
pub async fn submit(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewServiceRequest>,
) -> Result<(StatusCode, Json<ServiceRequest>), JsonApiError> {
    let req = state.requests.submit(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(req)))
}

#[utoipa::path(
    get, path = "/requests/{id}", tag = "requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "OK"),
        (status = 403, description = "Not visible to caller"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, JsonApiError> {
    Ok(Json(state.requests.get(&actor, id).await?))
}

#[utoipa::path(
    post, path = "/requests/{id}/claim", tag = "requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Claimed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "No longer open")
    )
)]
pub async fn claim(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, JsonApiError> {
    let req = state.requests.claim(&actor, id).await?;
    info!(request_id = %id, "claim_request_ok");
    Ok(Json(req))
}

#[utoipa::path(
    post, path = "/requests/{id}/complete", tag = "requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Completed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Not in progress")
    )
)]
pub async fn complete(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, JsonApiError> {
    Ok(Json(state.requests.complete(&actor, id).await?))
}

#[utoipa::path(
    post, path = "/requests/{id}/cancel", tag = "requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Cancelled"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "No longer pending")
    )
)]
pub async fn cancel(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, JsonApiError> {
    Ok(Json(state.requests.cancel(&actor, id).await?))
}
