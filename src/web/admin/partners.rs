use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::web::{
    AppState, auth,
    error::ApiError,
    models::{AssignmentRow, PageRefRow, PartnerRow},
};

/// `GET /api/admin/partner-assignments`: everything the assignment editor
/// needs in one payload: partner accounts, all pages, current pairs.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let partners = sqlx::query_as::<_, PartnerRow>(
        "SELECT id, email, full_name FROM users WHERE role = 'partner_view' ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    let pages = sqlx::query_as::<_, PageRefRow>(
        "SELECT id, slug, title FROM pages ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    let assignments = sqlx::query_as::<_, AssignmentRow>(
        "SELECT user_id, page_id FROM partner_page_access",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({
        "partners": partners,
        "pages": pages,
        "assignments": assignments,
    })))
}

#[derive(Deserialize)]
pub struct SaveAssignmentsPayload {
    user_id: Option<Uuid>,
    #[serde(default)]
    page_ids: Vec<Uuid>,
}

/// `POST /api/admin/partner-assignments`: replaces the user's assignment
/// set wholesale. Runs in a transaction so a failed insert cannot leave the
/// user half-assigned; an empty `page_ids` clears everything.
pub async fn save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SaveAssignmentsPayload>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let Some(target_user) = payload.user_id else {
        return Err(ApiError::validation("Invalid assignment payload"));
    };

    let mut tx = state.pool_ref().begin().await?;

    sqlx::query("DELETE FROM partner_page_access WHERE user_id = $1")
        .bind(target_user)
        .execute(&mut *tx)
        .await?;

    for page_id in &payload.page_ids {
        sqlx::query(
            "INSERT INTO partner_page_access (user_id, page_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(target_user)
        .bind(page_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Json(json!({ "status": "updated" })))
}
