use axum::{extract::State, http::StatusCode, Json};

use service::profiles::{CompleteProfileInput, Profile, ProfileUpdate};

use crate::{
    auth::{CurrentActor, Identity},
    errors::JsonApiError,
    state::ServerState,
};

#[utoipa::path(
    post, path = "/profiles", tag = "profiles",
    request_body = crate::openapi::CompleteProfileDoc,
    responses(
        (status = 201, description = "Profile created"),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Role not self-assignable"),
        (status = 409, description = "Profile already exists")
    )
)]
pub async fn complete(
    State(state): State<ServerState>,
    identity: Identity,
    Json(input): Json<CompleteProfileInput>,
) -> Result<(StatusCode, Json<Profile>), JsonApiError> {
    let p = state.profiles.complete_signup(identity.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(p)))
}

#[utoipa::path(
    get, path = "/me", tag = "profiles",
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Profile not completed yet")
    )
)]
pub async fn me(State(state): State<ServerState>, identity: Identity) -> Result<Json<Profile>, JsonApiError> {
    Ok(Json(state.profiles.get(identity.user_id).await?))
}

#[utoipa::path(
    patch, path = "/me", tag = "profiles",
    request_body = crate::openapi::ProfileUpdateDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn update_me(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Json(change): Json<ProfileUpdate>,
) -> Result<Json<Profile>, JsonApiError> {
    Ok(Json(state.profiles.update_me(&actor, change).await?))
}
