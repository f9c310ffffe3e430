use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::FromRow;
use uuid::Uuid;

use crate::web::{AppState, auth, error::ApiError, models::SubmissionRow};

/// `GET /api/admin/submissions`
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::FORM_ROLES)?;

    let submissions = sqlx::query_as::<_, SubmissionRow>(
        "SELECT s.id, s.page_id, p.slug, s.form_data_json, s.file_path, s.ip_address, s.created_at
         FROM submissions s JOIN pages p ON p.id = s.page_id
         ORDER BY s.created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "submissions": submissions })))
}

#[derive(FromRow)]
pub struct ExportRow {
    pub id: Uuid,
    pub slug: String,
    pub form_data_json: Value,
    pub file_path: Option<String>,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/admin/submissions/export`: CSV attachment.
pub async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = auth::require_user(state.pool_ref(), &headers).await?;
    auth::require_role(&user, auth::FORM_ROLES)?;

    let rows = sqlx::query_as::<_, ExportRow>(
        "SELECT s.id, p.slug, s.form_data_json, s.file_path, s.ip_address, s.created_at
         FROM submissions s JOIN pages p ON p.id = s.page_id
         ORDER BY s.created_at DESC",
    )
    .fetch_all(state.pool_ref())
    .await?;

    let body = render_csv(&rows);
    let response_headers = [
        (header::CONTENT_TYPE, "text/csv"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"submissions.csv\"",
        ),
    ];

    Ok((response_headers, body).into_response())
}

fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = String::from("id,slug,form_data,file_path,ip,created_at\n");

    for row in rows {
        let fields = [
            row.id.to_string(),
            row.slug.clone(),
            row.form_data_json.to_string(),
            row.file_path.clone().unwrap_or_default(),
            row.ip_address.clone(),
            row.created_at.to_rfc3339(),
        ];
        let line: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// RFC 4180 quoting: only fields containing separators, quotes, or line
/// breaks are wrapped, with embedded quotes doubled.
fn csv_field(value: &str) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn csv_field_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn export_rows_render_with_fixed_header() {
        let rows = vec![ExportRow {
            id: Uuid::nil(),
            slug: "industry-internships".to_string(),
            form_data_json: json!({ "email": "a@b.c" }),
            file_path: None,
            ip_address: "127.0.0.1".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }];

        let csv = render_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,slug,form_data,file_path,ip,created_at"
        );
        let data = lines.next().unwrap();
        assert!(data.starts_with("00000000-0000-0000-0000-000000000000,industry-internships,"));
        // The JSON payload contains commas and quotes, so it must be quoted.
        assert!(data.contains("\"{\"\"email\"\":\"\"a@b.c\"\"}\""));
        assert!(data.ends_with("2025-06-01T12:00:00+00:00"));
        assert!(lines.next().is_none());
    }
}
