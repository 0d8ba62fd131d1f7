use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub service: String }

#[derive(ToSchema)]
pub struct NewServiceRequestDoc {
    /// Free text; the catalogue at /catalog/service-types lists the usual ones
    pub service_type: String,
    pub description: String,
    pub location: String,
    /// Client's estimate, >= 0
    pub price: Option<f64>,
    /// YYYY-MM-DD
    pub preferred_date: Option<String>,
}

#[derive(ToSchema)]
pub struct CompleteProfileDoc {
    pub full_name: String,
    /// `client` or `specialist`
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(ToSchema)]
pub struct ProfileUpdateDoc {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::service_types,
        crate::routes::profiles::complete,
        crate::routes::profiles::me,
        crate::routes::profiles::update_me,
        crate::routes::requests::submit,
        crate::routes::requests::get,
        crate::routes::requests::claim,
        crate::routes::requests::complete,
        crate::routes::requests::cancel,
        crate::routes::dashboard::dashboard,
        crate::routes::dashboard::client_requests,
        crate::routes::dashboard::client_stats,
        crate::routes::dashboard::open_pool,
        crate::routes::dashboard::my_jobs,
        crate::routes::dashboard::specialist_stats,
        crate::routes::admin::stats,
        crate::routes::admin::requests,
        crate::routes::admin::activity,
        crate::routes::admin::profiles,
    ),
    components(
        schemas(
            HealthResponse,
            NewServiceRequestDoc,
            CompleteProfileDoc,
            ProfileUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "catalog"),
        (name = "profiles"),
        (name = "requests"),
        (name = "views"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_lifecycle_path() {
        let doc = ApiDoc::openapi();
        for p in ["/requests", "/requests/{id}/claim", "/requests/{id}/complete", "/requests/{id}/cancel", "/admin/stats"] {
            assert!(doc.paths.paths.contains_key(p), "missing {p}");
        }
    }
}
