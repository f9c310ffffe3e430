use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{AppState, auth, error::ApiError, models::ProgramRow};

#[derive(Deserialize)]
pub struct ProgramPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stipend: Option<f64>,
    #[serde(default)]
    partner: Option<String>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    published: Option<bool>,
}

/// `GET /api/admin/programs`: unpublished programs included.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let programs = sqlx::query_as::<_, ProgramRow>(
        "SELECT id, title, description, category, stipend, partner, start_date, published, created_at
         FROM programs ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "programs": programs })))
}

/// `POST /api/admin/programs`
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProgramPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let title = payload.title.trim().to_string();
    let category = payload.category.trim().to_string();
    if title.is_empty() || category.is_empty() {
        return Err(ApiError::validation("Title and category required"));
    }

    sqlx::query(
        "INSERT INTO programs (id, title, description, category, stipend, partner, start_date, published)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(Uuid::new_v4())
    .bind(&title)
    .bind(payload.description.unwrap_or_default())
    .bind(&category)
    .bind(payload.stipend.unwrap_or(0.0))
    .bind(payload.partner.unwrap_or_default())
    .bind(payload.start_date)
    .bind(payload.published.unwrap_or(true))
    .execute(state.pool_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

/// `PUT /api/admin/programs/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<ProgramPayload>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query(
        "UPDATE programs SET
            title = $2,
            description = $3,
            category = $4,
            stipend = $5,
            partner = $6,
            start_date = $7,
            published = $8
         WHERE id = $1",
    )
    .bind(id)
    .bind(payload.title.trim())
    .bind(payload.description.unwrap_or_default())
    .bind(payload.category.trim())
    .bind(payload.stipend.unwrap_or(0.0))
    .bind(payload.partner.unwrap_or_default())
    .bind(payload.start_date)
    .bind(payload.published.unwrap_or(true))
    .execute(state.pool_ref())
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Program not found"));
    }
    Ok(Json(json!({ "status": "updated" })))
}

/// `DELETE /api/admin/programs/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query("DELETE FROM programs WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Program not found"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}
