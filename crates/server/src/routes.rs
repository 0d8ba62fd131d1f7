use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{auth, openapi::ApiDoc, state::ServerState};

pub mod admin;
pub mod dashboard;
pub mod profiles;
pub mod requests;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok", service: "colmeia" })
}

#[utoipa::path(get, path = "/catalog/service-types", tag = "catalog", responses((status = 200, description = "Offered service categories")))]
pub async fn service_types(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.service_types.as_ref().clone())
}

/// Build the full application router, including public, role and admin routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + catalogue + docs)
    let public = Router::new()
        .route("/health", get(health))
        .route("/catalog/service-types", get(service_types))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let profile_routes = Router::new()
        .route("/profiles", post(profiles::complete))
        .route("/me", get(profiles::me).patch(profiles::update_me))
        .route("/dashboard", get(dashboard::dashboard));

    let request_routes = Router::new()
        .route("/requests", post(requests::submit))
        .route("/requests/:id", get(requests::get))
        .route("/requests/:id/claim", post(requests::claim))
        .route("/requests/:id/complete", post(requests::complete))
        .route("/requests/:id/cancel", post(requests::cancel));

    let view_routes = Router::new()
        .route("/client/requests", get(dashboard::client_requests))
        .route("/client/stats", get(dashboard::client_stats))
        .route("/specialist/open", get(dashboard::open_pool))
        .route("/specialist/jobs", get(dashboard::my_jobs))
        .route("/specialist/stats", get(dashboard::specialist_stats));

    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/requests", get(admin::requests))
        .route("/admin/activity", get(admin::activity))
        .route("/admin/profiles", get(admin::profiles));

    // Compose
    public
        .merge(profile_routes)
        .merge(request_routes)
        .merge(view_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
