use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{AppState, error::ApiError, models::ProgramRow};

/// `GET /api/programs`: published programs, newest start date first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let programs = sqlx::query_as::<_, ProgramRow>(
        "SELECT id, title, description, category, stipend, partner, start_date, published, created_at
         FROM programs WHERE published = TRUE
         ORDER BY start_date DESC NULLS LAST, created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "programs": programs })))
}

/// `GET /api/programs/:id`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let program = sqlx::query_as::<_, ProgramRow>(
        "SELECT id, title, description, category, stipend, partner, start_date, published, created_at
         FROM programs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(state.pool_ref())
    .await?
    .ok_or(ApiError::NotFound("Not found"))?;

    Ok(Json(json!({ "program": program })))
}
