use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use serde_json::{Value, json};

use crate::web::{
    AppState, admin, auth, csrf, error::ApiError, pages, partner, programs, submit,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/csrf", get(csrf::issue))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/pages", get(pages::index))
        .route("/api/pages/:slug", get(pages::show))
        .route("/api/pages/:slug/submit", post(submit::store))
        .route("/api/programs", get(programs::index))
        .route("/api/programs/:id", get(programs::show))
        .route("/api/admin/stats", get(admin::stats::overview))
        .route(
            "/api/admin/pages",
            get(admin::pages::index).post(admin::pages::create),
        )
        .route(
            "/api/admin/pages/:id",
            put(admin::pages::update).delete(admin::pages::remove),
        )
        .route(
            "/api/admin/programs",
            get(admin::programs::index).post(admin::programs::create),
        )
        .route(
            "/api/admin/programs/:id",
            put(admin::programs::update).delete(admin::programs::remove),
        )
        .route(
            "/api/admin/tracks",
            get(admin::tracks::index).post(admin::tracks::create),
        )
        .route(
            "/api/admin/tracks/:id",
            put(admin::tracks::update).delete(admin::tracks::remove),
        )
        .route("/api/admin/submissions", get(admin::submissions::index))
        .route(
            "/api/admin/submissions/export",
            get(admin::submissions::export),
        )
        .route("/api/admin/users", get(admin::users::index))
        .route("/api/admin/users/:id/role", patch(admin::users::update_role))
        .route(
            "/api/admin/media",
            get(admin::media::index).post(admin::media::upload),
        )
        .route("/api/admin/media/:id", delete(admin::media::remove))
        .route(
            "/api/admin/partner-assignments",
            get(admin::partners::index).post(admin::partners::save),
        )
        .route("/api/partner/overview", get(partner::overview))
        .route("/api/partner/submissions", get(partner::submissions))
        .route("/sitemap.xml", get(pages::sitemap))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}

/// Single-origin CORS, mirroring the configured frontend. Preflight
/// requests are answered directly without touching a handler.
async fn cors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = state.config().cors_origin.clone();

    let mut response = if req.method() == Method::OPTIONS {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        next.run(req).await
    };

    apply_cors_headers(response.headers_mut(), &origin);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization, Content-Type, X-CSRF-Token"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_headers_carry_the_configured_origin() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, "http://localhost:3000");

        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
                .unwrap()
                .to_str()
                .unwrap()
                .contains("X-CSRF-Token")
        );
    }

    #[test]
    fn invalid_origin_is_skipped_not_panicked() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, "bad\norigin");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_some());
    }
}
