use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{
    AppState,
    auth::{self, Role},
    error::ApiError,
    models::UserRow,
};

/// `GET /api/admin/users`
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::USER_ADMIN_ROLES)?;

    let users = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, full_name, role, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "users": users })))
}

#[derive(Deserialize)]
pub struct RolePayload {
    #[serde(default)]
    role: String,
}

/// `PATCH /api/admin/users/:id/role`
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<RolePayload>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::USER_ADMIN_ROLES)?;

    let Some(role) = Role::parse(&payload.role) else {
        return Err(ApiError::validation("Invalid role"));
    };

    let done = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
        .bind(id)
        .bind(role.as_str())
        .execute(state.pool_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("User not found"));
    }
    Ok(Json(json!({ "status": "updated" })))
}
