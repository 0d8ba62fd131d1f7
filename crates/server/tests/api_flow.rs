use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use configs::MarketplaceConfig;
use server::auth::Claims;
use server::routes;
use server::state::{ServerAuthConfig, ServerState};
use service::profiles::repository::mock::MockProfileRepository;
use service::profiles::Profile;
use service::requests::repository::mock::MockRequestRepository;
use service::Role;

const SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

struct TestApp {
    router: Router,
    profiles: Arc<MockProfileRepository>,
}

fn build_app() -> TestApp {
    let profiles = Arc::new(MockProfileRepository::default());
    let state = ServerState::new(
        Arc::new(MockRequestRepository::default()),
        profiles.clone(),
        ServerAuthConfig { jwt_secret: SECRET.into(), leeway_secs: 0 },
        &MarketplaceConfig::default(),
    );
    TestApp { router: routes::build_router(state, cors()), profiles }
}

fn token_for(user: Uuid) -> String {
    let exp = (Utc::now().timestamp() + 3600) as usize;
    let claims = Claims { sub: user, email: Some(format!("{user}@example.com")), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

async fn call(app: &TestApp, method: &str, uri: &str, user: Option<Uuid>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(u)));
    }
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.router.clone().call(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

async fn signup(app: &TestApp, name: &str, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    let (status, body) = call(app, "POST", "/profiles", Some(id), Some(json!({ "full_name": name, "role": role }))).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    id
}

fn seed_admin(app: &TestApp) -> Uuid {
    let now = Utc::now();
    let id = Uuid::new_v4();
    app.profiles.seed(Profile {
        id,
        full_name: "Operador".into(),
        role: Role::Admin,
        phone: None,
        avatar_url: None,
        bio: None,
        rating: 0.0,
        completed_jobs: 0,
        created_at: now,
        updated_at: now,
    });
    id
}

fn new_request(price: f64) -> Value {
    json!({
        "service_type": "Eletricista",
        "description": "Trocar tomadas da cozinha",
        "location": "Rua das Palmeiras, 45",
        "price": price,
        "preferred_date": "2024-05-20"
    })
}

#[tokio::test]
async fn health_and_catalog_are_public() {
    let app = build_app();
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, "GET", "/catalog/service-types", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(13));
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = build_app();
    let (status, _) = call(&app, "GET", "/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/dashboard")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let resp = app.router.clone().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn incomplete_profile_is_forbidden_until_signup() {
    let app = build_app();
    let user = Uuid::new_v4();
    let (status, _) = call(&app, "GET", "/dashboard", Some(user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", "/me", Some(user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "POST", "/profiles", Some(user), Some(json!({ "full_name": "Rita", "role": "admin" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "POST", "/profiles", Some(user), Some(json!({ "full_name": "Rita", "role": "client" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, "GET", "/dashboard", Some(user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "client");
}

#[tokio::test]
async fn lifecycle_over_http() {
    let app = build_app();
    let client = signup(&app, "Ana", "client").await;
    let specialist = signup(&app, "Beto", "specialist").await;
    let rival = signup(&app, "Caio", "specialist").await;

    let (status, created) = call(&app, "POST", "/requests", Some(client), Some(new_request(150.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert!(created["specialist_id"].is_null());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "POST", "/requests", Some(specialist), Some(new_request(1.0))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, claimed) = call(&app, "POST", &format!("/requests/{id}/claim"), Some(specialist), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claimed["status"], "in_progress");
    assert_eq!(claimed["specialist_id"], specialist.to_string());

    let (status, _) = call(&app, "POST", &format!("/requests/{id}/claim"), Some(rival), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, "POST", &format!("/requests/{id}/complete"), Some(rival), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "POST", &format!("/requests/{id}/cancel"), Some(client), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, done) = call(&app, "POST", &format!("/requests/{id}/complete"), Some(specialist), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert!(!done["completed_at"].is_null());

    let (status, stats) = call(&app, "GET", "/specialist/stats", Some(specialist), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["earnings"], 150.0);
    assert_eq!(stats["completed"], 1);
}

#[tokio::test]
async fn other_client_cannot_see_or_cancel() {
    let app = build_app();
    let owner = signup(&app, "Dora", "client").await;
    let other = signup(&app, "Enzo", "client").await;
    let (_, created) = call(&app, "POST", "/requests", Some(owner), Some(new_request(80.0))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "GET", &format!("/requests/{id}"), Some(other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "POST", &format!("/requests/{id}/cancel"), Some(other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "POST", &format!("/requests/{id}/cancel"), Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = call(&app, "GET", &format!("/requests/{}", Uuid::new_v4()), Some(owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_search_and_validation() {
    let app = build_app();
    let client = signup(&app, "Fabi", "client").await;
    call(&app, "POST", "/requests", Some(client), Some(new_request(10.0))).await;
    let mut painter = new_request(20.0);
    painter["service_type"] = json!("Pintor");
    painter["description"] = json!("Pintar fachada");
    call(&app, "POST", "/requests", Some(client), Some(painter)).await;

    let (status, rows) = call(&app, "GET", "/client/requests?status=all&q=fachada", Some(client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().map(Vec::len), Some(1));

    let (status, rows) = call(&app, "GET", "/client/requests?status=completed", Some(client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().map(Vec::len), Some(0));

    let (status, _) = call(&app, "GET", "/client/requests?status=archived", Some(client), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad = new_request(-1.0);
    bad["location"] = json!("Centro");
    let (status, body) = call(&app, "POST", "/requests", Some(client), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2001);
}

#[tokio::test]
async fn admin_views_are_admin_only() {
    let app = build_app();
    let client = signup(&app, "Gil", "client").await;
    let admin = seed_admin(&app);
    for p in [100.0, 50.0] {
        call(&app, "POST", "/requests", Some(client), Some(new_request(p))).await;
    }

    let (status, stats) = call(&app, "GET", "/admin/stats", Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["requests"]["total"], 2);
    assert_eq!(stats["users"]["admins"], 1);
    assert_eq!(stats["total_revenue"], 0.0);

    let (status, page) = call(&app, "GET", "/admin/requests?page=1&per_page=1", Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().map(Vec::len), Some(1));

    let (status, feed) = call(&app, "GET", "/admin/activity", Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed[0]["client_name"], "Gil");
    assert_eq!(feed[0]["status_label"], "Pendente");

    let (status, _) = call(&app, "GET", "/admin/stats", Some(client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", "/admin/profiles", Some(client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patch_me_cannot_change_role() {
    let app = build_app();
    let user = signup(&app, "Hugo", "specialist").await;
    let (status, _) = call(&app, "PATCH", "/me", Some(user), Some(json!({ "role": "admin" }))).await;
    assert!(status.is_client_error());

    let (status, body) = call(&app, "PATCH", "/me", Some(user), Some(json!({ "bio": "Pintor há 10 anos" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "specialist");
    assert_eq!(body["bio"], "Pintor há 10 anos");
}
