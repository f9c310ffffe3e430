use axum::{Json, extract::State, http::HeaderMap};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use crate::web::{
    AppState, auth,
    error::ApiError,
    models::{PageRefRow, PartnerSubmissionRow},
};

/// `GET /api/partner/overview`: the caller's assigned pages plus a
/// submission counter across them.
pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::PARTNER_ROLES)?;

    let pages = assigned_pages(state.pool_ref(), user.id).await?;
    if pages.is_empty() {
        return Ok(Json(json!({ "pages": [], "stats": { "submissions": 0 } })));
    }

    let page_ids: Vec<Uuid> = pages.iter().map(|page| page.id).collect();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE page_id = ANY($1)")
        .bind(&page_ids)
        .fetch_one(state.pool_ref())
        .await?;

    Ok(Json(json!({ "pages": pages, "stats": { "submissions": count } })))
}

/// `GET /api/partner/submissions`: submissions restricted to the caller's
/// assigned pages.
pub async fn submissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::PARTNER_ROLES)?;

    let pages = assigned_pages(state.pool_ref(), user.id).await?;
    if pages.is_empty() {
        return Ok(Json(json!({ "submissions": [] })));
    }

    let page_ids: Vec<Uuid> = pages.iter().map(|page| page.id).collect();
    let submissions = sqlx::query_as::<_, PartnerSubmissionRow>(
        "SELECT s.id, p.slug, s.form_data_json, s.file_path, s.created_at
         FROM submissions s JOIN pages p ON p.id = s.page_id
         WHERE s.page_id = ANY($1)
         ORDER BY s.created_at DESC",
    )
    .bind(&page_ids)
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "submissions": submissions })))
}

async fn assigned_pages(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<PageRefRow>> {
    sqlx::query_as::<_, PageRefRow>(
        "SELECT p.id, p.slug, p.title
         FROM partner_page_access a JOIN pages p ON p.id = a.page_id
         WHERE a.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
