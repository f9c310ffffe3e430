use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{AppState, auth, error::ApiError, models::TrackRow};

#[derive(Deserialize)]
pub struct TrackPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

/// `GET /api/admin/tracks`
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let tracks = sqlx::query_as::<_, TrackRow>(
        "SELECT id, name, category, description, is_active, created_at
         FROM program_tracks ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "tracks": tracks })))
}

/// `POST /api/admin/tracks`
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TrackPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let name = payload.name.trim().to_string();
    let category = payload.category.trim().to_string();
    if name.is_empty() || category.is_empty() {
        return Err(ApiError::validation("Name and category required"));
    }

    sqlx::query(
        "INSERT INTO program_tracks (id, name, category, description, is_active)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&category)
    .bind(payload.description.unwrap_or_default())
    .bind(payload.is_active.unwrap_or(true))
    .execute(state.pool_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

/// `PUT /api/admin/tracks/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<TrackPayload>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query(
        "UPDATE program_tracks SET
            name = $2,
            category = $3,
            description = $4,
            is_active = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(payload.category.trim())
    .bind(payload.description.unwrap_or_default())
    .bind(payload.is_active.unwrap_or(true))
    .execute(state.pool_ref())
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Track not found"));
    }
    Ok(Json(json!({ "status": "updated" })))
}

/// `DELETE /api/admin/tracks/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query("DELETE FROM program_tracks WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Track not found"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}
