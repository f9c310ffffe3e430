use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::web::{AppState, auth, error::ApiError, models::MediaRow, uploads};

/// Extensions accepted for the media library.
pub const MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp"];
const MEDIA_DIR: &str = "media";

/// `GET /api/admin/media`
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let media = sqlx::query_as::<_, MediaRow>(
        "SELECT id, file_name, file_path, file_type, created_at FROM media ORDER BY created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "media": media })))
}

/// `POST /api/admin/media`: multipart upload with a single `file` field.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let form = uploads::read_form(multipart).await.map_err(|err| {
        error!(?err, "failed to read media upload form");
        ApiError::validation("Upload failed")
    })?;

    let Some(file) = form.file.filter(|file| file.field_name == "file") else {
        return Err(ApiError::validation("No file provided"));
    };
    if !MEDIA_EXTENSIONS.contains(&file.extension.as_str()) {
        return Err(ApiError::validation("Invalid media type"));
    }

    let dir = state.config().storage_root.join(MEDIA_DIR);
    let stored_name = uploads::persist(&file, &dir).await.map_err(|err| {
        error!(?err, "failed to persist media upload");
        ApiError::Internal
    })?;

    sqlx::query("INSERT INTO media (id, file_name, file_path, file_type) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(sanitize_filename::sanitize(&file.original_name))
        .bind(format!("/storage/media/{stored_name}"))
        .bind(&file.extension)
        .execute(state.pool_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "uploaded" }))))
}

/// `DELETE /api/admin/media/:id`: removes the row; the file on disk is
/// left for out-of-band cleanup.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::CONTENT_ROLES)?;

    let done = sqlx::query("DELETE FROM media WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Media not found"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_allow_list_is_images_only() {
        for ext in ["png", "jpg", "jpeg", "svg", "webp"] {
            assert!(MEDIA_EXTENSIONS.contains(&ext));
        }
        for ext in ["pdf", "exe", "html", "JPG", ""] {
            assert!(!MEDIA_EXTENSIONS.contains(&ext));
        }
    }
}
