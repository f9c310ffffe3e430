//! Fallback content catalog and the merge rules the marketing pages use.
//!
//! Each built-in page ships with a complete static content set so the site
//! renders even when the backend has no row for it. When a live page row
//! exists, its fields override the fallback field-by-field and its section
//! list drives which blocks stay visible.

#![allow(dead_code)]

mod catalog;

pub use catalog::{catalog, find_page};

use std::collections::HashSet;

use serde::Serialize;

use crate::sections::{FormField, HighlightItem, Section, StatItem, parse_sections};
use crate::web::models::PageRow;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Hero {
    pub kicker: String,
    pub title: String,
    pub subtitle: String,
    pub background: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub schema_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormContent {
    pub title: String,
    pub description: String,
    pub fields: Vec<FormField>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CarouselContent {
    pub title: String,
    pub items: Vec<String>,
}

/// Renderable content for one marketing page, either straight from the
/// catalog or merged with a live page row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub key: String,
    pub path: String,
    pub label: String,
    pub slug: String,
    pub hero: Hero,
    pub stats: Vec<StatItem>,
    pub highlights: Vec<HighlightItem>,
    pub carousel: CarouselContent,
    pub rich_text: String,
    pub form: FormContent,
    pub meta: PageMeta,
}

/// Sections that should reach the public renderer: unknown blocks and
/// anything explicitly deactivated are dropped, order is kept.
pub fn visible_sections(sections: &[Section]) -> Vec<&Section> {
    sections.iter().filter(|s| s.is_visible()).collect()
}

/// Overlays a live page row onto its fallback catalog entry.
///
/// Scalar fields follow last-writer-wins with empty live values keeping the
/// fallback. Item sections replace the fallback block when present and
/// active, and suppress it entirely when deactivated. Live form questions
/// extend the fallback form, deduplicated by field name.
pub fn merge_live(fallback: &PageContent, live: &PageRow) -> PageContent {
    let sections = parse_sections(&live.sections_json);
    let mut merged = fallback.clone();

    merged.slug = if live.slug.is_empty() {
        fallback.path.trim_start_matches('/').to_string()
    } else {
        live.slug.clone()
    };

    override_if_set(&mut merged.hero.title, &live.hero_title);
    override_if_set(&mut merged.hero.subtitle, &live.hero_subtitle);
    override_if_set(&mut merged.hero.background, &live.hero_background);
    override_if_set(&mut merged.meta.title, &live.meta_title);
    override_if_set(&mut merged.meta.description, &live.meta_description);
    override_if_set(&mut merged.meta.schema_type, &live.schema_type);

    for section in &sections {
        match section {
            Section::Highlights { is_active, items } => {
                merged.highlights = if *is_active { items.clone() } else { Vec::new() };
            }
            Section::Stats { is_active, items } => {
                merged.stats = if *is_active { items.clone() } else { Vec::new() };
            }
            Section::Carousel {
                is_active,
                title,
                items,
            } => {
                if *is_active {
                    override_if_set(&mut merged.carousel.title, title);
                    merged.carousel.items = items.clone();
                } else {
                    merged.carousel.items = Vec::new();
                }
            }
            Section::RichText { is_active, html } => {
                merged.rich_text = if *is_active { html.clone() } else { String::new() };
            }
            Section::FormQuestions { fields } => {
                if !fields.is_empty() {
                    merged.form.fields = merge_fields(&fallback.form.fields, fields);
                }
            }
            Section::Unknown => {}
        }
    }

    merged
}

/// Appends live form fields that the fallback does not already define.
/// Nameless live fields are auto-named `custom_{n}` by position.
pub fn merge_fields(base: &[FormField], extra: &[FormField]) -> Vec<FormField> {
    let existing: HashSet<&str> = base.iter().map(|field| field.name.as_str()).collect();
    let mut merged = base.to_vec();

    for (index, field) in extra.iter().enumerate() {
        let mut field = field.clone();
        if field.name.is_empty() {
            field.name = format!("custom_{}", index + 1);
        }
        if !existing.contains(field.name.as_str()) {
            merged.push(field);
        }
    }

    merged
}

fn override_if_set(target: &mut String, live: &str) {
    if !live.is_empty() {
        *target = live.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn live_page(sections: Value) -> PageRow {
        PageRow {
            id: Uuid::new_v4(),
            slug: "industry-internships".to_string(),
            title: "Industry Internships".to_string(),
            hero_title: "Live hero".to_string(),
            hero_subtitle: String::new(),
            hero_background: String::new(),
            sections_json: sections,
            meta_title: String::new(),
            meta_description: String::new(),
            schema_type: "Course".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fallback() -> PageContent {
        find_page("industry-internships").expect("catalog entry")
    }

    #[test]
    fn live_scalars_override_fallback_but_empty_values_do_not() {
        let merged = merge_live(&fallback(), &live_page(json!([])));
        assert_eq!(merged.hero.title, "Live hero");
        assert_eq!(merged.hero.subtitle, fallback().hero.subtitle);
        assert_eq!(merged.meta.schema_type, "Course");
    }

    #[test]
    fn deactivated_sections_are_suppressed() {
        let merged = merge_live(
            &fallback(),
            &live_page(json!([
                { "type": "highlights", "is_active": false, "items": [{ "title": "x" }] },
                { "type": "stats", "is_active": false },
            ])),
        );
        assert!(merged.highlights.is_empty());
        assert!(merged.stats.is_empty());
        assert!(!merged.carousel.items.is_empty(), "untouched blocks keep fallback");
    }

    #[test]
    fn active_sections_replace_fallback_items() {
        let merged = merge_live(
            &fallback(),
            &live_page(json!([
                { "type": "carousel", "title": "Fresh", "items": ["one", "two"] },
            ])),
        );
        assert_eq!(merged.carousel.title, "Fresh");
        assert_eq!(merged.carousel.items, vec!["one", "two"]);
    }

    #[test]
    fn live_form_questions_extend_the_fallback_form() {
        let merged = merge_live(
            &fallback(),
            &live_page(json!([
                { "type": "form_questions", "fields": [
                    { "name": "email", "label": "Duplicate", "required": true },
                    { "label": "Extra question", "type": "textarea" },
                ]},
            ])),
        );

        let names: Vec<&str> = merged.form.fields.iter().map(|f| f.name.as_str()).collect();
        let base_len = fallback().form.fields.len();
        assert_eq!(merged.form.fields.len(), base_len + 1);
        assert!(names.contains(&"custom_2"));
        // The duplicate keeps the fallback definition.
        let email = merged.form.fields.iter().find(|f| f.name == "email").unwrap();
        assert_ne!(email.label, "Duplicate");
    }

    #[test]
    fn visible_sections_drop_unknown_and_inactive_blocks() {
        let sections = parse_sections(&json!([
            { "type": "stats", "is_active": false },
            { "type": "mystery" },
            { "type": "rich_text", "html": "shown" },
        ]));
        let visible = visible_sections(&sections);
        assert_eq!(visible.len(), 1);
        assert!(matches!(visible[0], Section::RichText { .. }));
    }

    #[test]
    fn catalog_entries_are_complete() {
        for entry in catalog() {
            assert!(!entry.key.is_empty());
            assert!(entry.path.starts_with('/'));
            assert!(!entry.hero.title.is_empty());
            assert!(!entry.form.fields.is_empty());
            assert!(
                entry.form.fields.iter().all(|f| !f.name.is_empty()),
                "catalog form fields must be named"
            );
        }
        assert!(find_page("no-such-page").is_none());
    }
}
