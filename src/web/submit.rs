//! Public form-submission intake. Each request runs a single pipeline:
//! resolve the page, verify the captcha, verify CSRF, validate required
//! fields, persist an optional upload, then insert the row. Any failure
//! short-circuits before anything touches disk or the database.

use std::net::SocketAddr;

use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, FromRequest, Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode, header},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value, json};
use tracing::error;
use uuid::Uuid;

use crate::{
    sections,
    web::{
        AppState, csrf,
        error::ApiError,
        uploads::{self, BufferedFile},
    },
};

/// Extensions accepted for applicant document uploads.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const UPLOADS_DIR: &str = "uploads";

#[derive(sqlx::FromRow)]
struct PageLookup {
    id: Uuid,
    sections_json: Value,
}

/// `POST /api/pages/:slug/submit`: accepts multipart form data or a JSON
/// object body.
pub async fn store(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let headers = req.headers().clone();
    let jar = CookieJar::from_headers(&headers);

    let page = sqlx::query_as::<_, PageLookup>("SELECT id, sections_json FROM pages WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(state.pool_ref())
        .await?
        .ok_or(ApiError::NotFound("Page not found"))?;

    let (payload, file) = read_payload(&state, req, &headers).await?;

    let captcha_token = payload
        .get("captcha_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if captcha_token.is_empty() {
        return Err(ApiError::validation("Captcha required"));
    }
    // Best-effort peer address; untrusted, recorded as-is.
    let remote_ip = addr.ip().to_string();
    if !state.captcha().verify(captcha_token, &remote_ip).await {
        return Err(ApiError::validation("Captcha verification failed"));
    }

    if !csrf::verify_double_submit(&headers, &jar) {
        return Err(ApiError::CsrfMismatch);
    }

    let page_sections = sections::parse_sections(&page.sections_json);
    let errors = sections::required_field_errors(&page_sections, &payload, file.is_some());
    if !errors.is_empty() {
        return Err(ApiError::validation_list(errors));
    }

    let file_path = match file {
        Some(file) => Some(persist_document(&state, &file).await?),
        None => None,
    };

    sqlx::query(
        "INSERT INTO submissions (id, page_id, form_data_json, file_path, ip_address)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(page.id)
    .bind(Value::Object(payload))
    .bind(&file_path)
    .bind(&remote_ip)
    .execute(state.pool_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "received" }))))
}

async fn read_payload(
    state: &AppState,
    req: Request,
    headers: &HeaderMap,
) -> Result<(Map<String, Value>, Option<BufferedFile>), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, state).await.map_err(|err| {
            error!(?err, "rejected submission multipart body");
            ApiError::validation("Malformed form payload")
        })?;
        let form = uploads::read_form(multipart).await.map_err(|err| {
            error!(?err, "failed to read submission form");
            ApiError::validation("Malformed form payload")
        })?;
        Ok((form.fields, form.file))
    } else {
        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            error!(?err, "failed to read submission body");
            ApiError::validation("Malformed form payload")
        })?;
        if bytes.is_empty() {
            return Ok((Map::new(), None));
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok((map, None)),
            _ => Ok((Map::new(), None)),
        }
    }
}

async fn persist_document(state: &AppState, file: &BufferedFile) -> Result<String, ApiError> {
    if !DOCUMENT_EXTENSIONS.contains(&file.extension.as_str()) {
        return Err(ApiError::validation("Invalid file type"));
    }

    let dir = state.config().storage_root.join(UPLOADS_DIR);
    let stored_name = uploads::persist(file, &dir).await.map_err(|err| {
        error!(?err, "failed to persist submission upload");
        ApiError::Internal
    })?;

    Ok(format!("/storage/uploads/{stored_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_allow_list_is_exact() {
        for ext in ["pdf", "doc", "docx"] {
            assert!(DOCUMENT_EXTENSIONS.contains(&ext));
        }
        for ext in ["exe", "js", "png", "PDF", ""] {
            assert!(!DOCUMENT_EXTENSIONS.contains(&ext));
        }
    }
}
