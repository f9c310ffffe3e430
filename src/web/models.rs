use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct PageRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_background: String,
    pub sections_json: Value,
    pub meta_title: String,
    pub meta_description: String,
    pub schema_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, FromRow, Serialize)]
pub struct ProgramRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub stipend: f64,
    pub partner: String,
    pub start_date: Option<NaiveDate>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, FromRow, Serialize)]
pub struct TrackRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Submission joined with its page slug, as listed in the admin studio.
#[derive(Clone, FromRow, Serialize)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub page_id: Uuid,
    pub slug: String,
    pub form_data_json: Value,
    pub file_path: Option<String>,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, FromRow, Serialize)]
pub struct MediaRow {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Minimal page reference used by partner assignment views.
#[derive(Clone, FromRow, Serialize)]
pub struct PageRefRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

#[derive(Clone, FromRow, Serialize)]
pub struct PartnerRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

#[derive(Clone, FromRow, Serialize)]
pub struct AssignmentRow {
    pub user_id: Uuid,
    pub page_id: Uuid,
}

/// Submission view exposed to partner accounts; omits the requester IP.
#[derive(Clone, FromRow, Serialize)]
pub struct PartnerSubmissionRow {
    pub id: Uuid,
    pub slug: String,
    pub form_data_json: Value,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
