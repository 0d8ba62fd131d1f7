use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::Actor;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// A verified token holder, who may not have completed their profile yet.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// The calling actor: verified identity plus the role from their profile.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

fn is_public(path: &str, method: &Method) -> bool {
    path == "/health"
        || path == "/catalog/service-types"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == Method::OPTIONS
}

pub fn verify_token(token: &str, cfg: &crate::state::ServerAuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = cfg.leeway_secs;
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// 全局中间件：除白名单外，校验 Authorization: Bearer <token>
/// 通过后注入 Identity；若已完成资料，同时注入 Actor
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(&path, req.method()) {
        return Ok(next.run(req).await);
    }

    let token = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(JsonApiError::unauthorized("expected a Bearer token"));
            }
        },
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(JsonApiError::unauthorized("missing Authorization header"));
        }
    };

    let claims = verify_token(&token, &state.auth).map_err(|e| {
        tracing::warn!(path = %path, err = %e, "token validation failed");
        JsonApiError::unauthorized("invalid or expired token")
    })?;

    let actor = state.profiles.resolve_actor(claims.sub, claims.email.clone()).await?;
    req.extensions_mut().insert(Identity { user_id: claims.sub, email: claims.email });
    if let Some(actor) = actor {
        req.extensions_mut().insert(actor);
    }
    Ok(next.run(req).await)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| JsonApiError::unauthorized("authentication required"))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<Actor>() {
            return Ok(CurrentActor(actor.clone()));
        }
        if parts.extensions.get::<Identity>().is_some() {
            return Err(JsonApiError::new(
                StatusCode::FORBIDDEN,
                "Profile Incomplete",
                Some("complete your profile via POST /profiles first".into()),
            ));
        }
        Err(JsonApiError::unauthorized("authentication required"))
    }
}
