use anyhow::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    writer::Writer,
};
use serde_json::{Value, json};
use sqlx::FromRow;
use tracing::error;

use crate::web::{AppState, error::ApiError, models::PageRow};

/// `GET /api/pages`: active pages only.
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pages = sqlx::query_as::<_, PageRow>(
        "SELECT id, slug, title, hero_title, hero_subtitle, hero_background, sections_json,
                meta_title, meta_description, schema_type, is_active, created_at, updated_at
         FROM pages WHERE is_active = TRUE ORDER BY created_at",
    )
    .fetch_all(state.pool_ref())
    .await?;

    Ok(Json(json!({ "pages": pages })))
}

/// `GET /api/pages/:slug`: inactive pages are invisible here, though they
/// remain editable through the admin endpoints.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let page = sqlx::query_as::<_, PageRow>(
        "SELECT id, slug, title, hero_title, hero_subtitle, hero_background, sections_json,
                meta_title, meta_description, schema_type, is_active, created_at, updated_at
         FROM pages WHERE slug = $1",
    )
    .bind(&slug)
    .fetch_optional(state.pool_ref())
    .await?;

    match page {
        Some(page) if page.is_active => Ok(Json(json!({ "page": page }))),
        _ => Err(ApiError::NotFound("Page not found")),
    }
}

#[derive(FromRow)]
pub struct SitemapRow {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// `GET /sitemap.xml`
pub async fn sitemap(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = sqlx::query_as::<_, SitemapRow>(
        "SELECT slug, updated_at FROM pages WHERE is_active = TRUE ORDER BY slug",
    )
    .fetch_all(state.pool_ref())
    .await?;

    let xml = render_sitemap(&state.config().app_url, &rows).map_err(|err| {
        error!(?err, "failed to render sitemap");
        ApiError::Internal
    })?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

fn render_sitemap(base_url: &str, rows: &[SitemapRow]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"));
    writer.write_event(Event::Start(urlset))?;

    for row in rows {
        writer.write_event(Event::Start(BytesStart::new("url")))?;

        writer.write_event(Event::Start(BytesStart::new("loc")))?;
        writer.write_event(Event::Text(BytesText::new(&format!(
            "{}/{}",
            base_url, row.slug
        ))))?;
        writer.write_event(Event::End(BytesEnd::new("loc")))?;

        writer.write_event(Event::Start(BytesStart::new("lastmod")))?;
        writer.write_event(Event::Text(BytesText::new(&row.updated_at.to_rfc3339())))?;
        writer.write_event(Event::End(BytesEnd::new("lastmod")))?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sitemap_lists_each_slug_with_lastmod() {
        let rows = vec![
            SitemapRow {
                slug: "industry-internships".to_string(),
                updated_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            },
            SitemapRow {
                slug: "custom-training".to_string(),
                updated_at: Utc.with_ymd_and_hms(2025, 7, 2, 8, 30, 0).unwrap(),
            },
        ];

        let xml = render_sitemap("https://example.org", &rows).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<loc>https://example.org/industry-internships</loc>"));
        assert!(xml.contains("<loc>https://example.org/custom-training</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01T12:00:00+00:00</lastmod>"));
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_with_no_pages_is_an_empty_urlset() {
        let xml = render_sitemap("https://example.org", &[]).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }
}
