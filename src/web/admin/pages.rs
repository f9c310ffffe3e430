use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{AppState, auth, error::ApiError, models::PageRow};

#[derive(Deserialize)]
pub struct PagePayload {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    hero_title: Option<String>,
    #[serde(default)]
    hero_subtitle: Option<String>,
    #[serde(default)]
    hero_background: Option<String>,
    /// Stored verbatim; the section list round-trips byte-for-byte.
    #[serde(default)]
    sections: Option<Value>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    schema_type: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

/// `GET /api/admin/pages`: every page, inactive ones included.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let pages = sqlx::query_as::<_, PageRow>(
        "SELECT id, slug, title, hero_title, hero_subtitle, hero_background, sections_json,
                meta_title, meta_description, schema_type, is_active, created_at, updated_at
         FROM pages ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "pages": pages })))
}

/// `POST /api/admin/pages`
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PagePayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let slug = payload.slug.trim().to_string();
    let title = payload.title.trim().to_string();
    if slug.is_empty() || title.is_empty() {
        return Err(ApiError::validation("Slug and title required."));
    }

    let sections = payload.sections.unwrap_or_else(|| json!([]));

    let result = sqlx::query(
        "INSERT INTO pages (id, slug, title, hero_title, hero_subtitle, hero_background,
                            sections_json, meta_title, meta_description, schema_type, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(Uuid::new_v4())
    .bind(&slug)
    .bind(&title)
    .bind(payload.hero_title.unwrap_or_else(|| title.clone()))
    .bind(payload.hero_subtitle.unwrap_or_default())
    .bind(payload.hero_background.unwrap_or_default())
    .bind(&sections)
    .bind(payload.meta_title.unwrap_or_else(|| title.clone()))
    .bind(payload.meta_description.unwrap_or_default())
    .bind(payload.schema_type.unwrap_or_else(|| "Organization".to_string()))
    .bind(payload.is_active.unwrap_or(true))
    .execute(state.pool_ref())
    .await;

    match result {
        Ok(_) => Ok((StatusCode::CREATED, Json(json!({ "status": "created" })))),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            Err(ApiError::Conflict("Slug already in use."))
        }
        Err(err) => Err(ApiError::from_db(err)),
    }
}

/// `PUT /api/admin/pages/:id`: full-row update.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<PagePayload>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let sections = payload.sections.unwrap_or_else(|| json!([]));

    let result = sqlx::query(
        "UPDATE pages SET
            slug = $2,
            title = $3,
            hero_title = $4,
            hero_subtitle = $5,
            hero_background = $6,
            sections_json = $7,
            meta_title = $8,
            meta_description = $9,
            schema_type = $10,
            is_active = $11,
            updated_at = NOW()
         WHERE id = $1",
    )
    .bind(id)
    .bind(payload.slug.trim())
    .bind(payload.title.trim())
    .bind(payload.hero_title.unwrap_or_default())
    .bind(payload.hero_subtitle.unwrap_or_default())
    .bind(payload.hero_background.unwrap_or_default())
    .bind(&sections)
    .bind(payload.meta_title.unwrap_or_default())
    .bind(payload.meta_description.unwrap_or_default())
    .bind(payload.schema_type.unwrap_or_else(|| "Organization".to_string()))
    .bind(payload.is_active.unwrap_or(true))
    .execute(state.pool_ref())
    .await;

    match result {
        Ok(done) if done.rows_affected() > 0 => Ok(Json(json!({ "status": "updated" }))),
        Ok(_) => Err(ApiError::NotFound("Page not found")),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            Err(ApiError::Conflict("Slug already in use."))
        }
        Err(err) => Err(ApiError::from_db(err)),
    }
}

/// `DELETE /api/admin/pages/:id`: submissions and partner assignments go
/// with it via cascading foreign keys.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query("DELETE FROM pages WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Page not found"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}
