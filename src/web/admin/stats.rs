use axum::{Json, extract::State, http::HeaderMap};
use serde_json::{Value, json};

use crate::web::{AppState, auth, error::ApiError};

/// `GET /api/admin/stats`: dashboard counters.
pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::STATS_ROLES)?;

    let pool = state.pool_ref();
    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(pool);
    let pages = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages").fetch_one(pool);
    let submissions =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions").fetch_one(pool);

    let (users, pages, submissions) = tokio::try_join!(users, pages, submissions)?;

    Ok(Json(json!({
        "stats": {
            "users": users,
            "pages": pages,
            "submissions": submissions,
        },
    })))
}
