//! Typed model for the ordered section list stored on each page.
//!
//! Pages persist their section list verbatim as JSON so that the admin
//! studio round-trips documents byte-for-byte. This module parses that
//! blob into a tagged union for validation and rendering; an element with
//! an unrecognized or missing `type` becomes [`Section::Unknown`] and is
//! treated as absent instead of poisoning the rest of the list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    FormQuestions {
        #[serde(default)]
        fields: Vec<FormField>,
    },
    Highlights {
        #[serde(default = "default_true")]
        is_active: bool,
        #[serde(default)]
        items: Vec<HighlightItem>,
    },
    Stats {
        #[serde(default = "default_true")]
        is_active: bool,
        #[serde(default)]
        items: Vec<StatItem>,
    },
    Carousel {
        #[serde(default = "default_true")]
        is_active: bool,
        #[serde(default)]
        title: String,
        #[serde(default)]
        items: Vec<String>,
    },
    RichText {
        #[serde(default = "default_true")]
        is_active: bool,
        #[serde(default)]
        html: String,
    },
    #[serde(other)]
    Unknown,
}

impl Section {
    /// Sections default to visible; only an explicit `is_active: false`
    /// suppresses them from public rendering. Unknown sections never render.
    pub fn is_visible(&self) -> bool {
        match self {
            Section::FormQuestions { .. } => true,
            Section::Highlights { is_active, .. }
            | Section::Stats { is_active, .. }
            | Section::Carousel { is_active, .. }
            | Section::RichText { is_active, .. } => *is_active,
            Section::Unknown => false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FormField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Input kinds supported by the form renderer. Anything else degrades to a
/// plain text input rather than rejecting the whole section.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Number,
    Textarea,
    Select,
    File,
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "email" => FieldKind::Email,
            "number" => FieldKind::Number,
            "textarea" => FieldKind::Textarea,
            "select" => FieldKind::Select,
            "file" => FieldKind::File,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct HighlightItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct StatItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub suffix: String,
}

/// Parses a stored `sections_json` value. Non-array documents yield an
/// empty list; malformed elements become [`Section::Unknown`] in place so
/// ordering is preserved.
pub fn parse_sections(raw: &Value) -> Vec<Section> {
    match raw.as_array() {
        Some(items) => items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).unwrap_or(Section::Unknown))
            .collect(),
        None => Vec::new(),
    }
}

/// Validates a submission payload against every `form_questions` section.
/// File-kind fields are satisfied by any uploaded file; other required
/// fields need a non-empty value under their name.
pub fn required_field_errors(
    sections: &[Section],
    payload: &Map<String, Value>,
    has_file: bool,
) -> Vec<String> {
    let mut errors = Vec::new();

    for section in sections {
        let Section::FormQuestions { fields } = section else {
            continue;
        };
        for field in fields {
            if !field.required || field.name.is_empty() {
                continue;
            }
            if field.kind == FieldKind::File {
                if !has_file {
                    errors.push(format!("{} is required.", field.name));
                }
                continue;
            }
            let missing = match payload.get(&field.name) {
                None | Some(Value::Null) => true,
                Some(Value::String(value)) => value.is_empty(),
                Some(_) => false,
            };
            if missing {
                errors.push(format!("{} is required.", field.name));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_section(fields: Value) -> Value {
        json!({ "type": "form_questions", "fields": fields })
    }

    #[test]
    fn parses_each_variant_by_tag() {
        let raw = json!([
            { "type": "highlights", "items": [{ "title": "Mentors", "text": "Weekly" }] },
            { "type": "stats", "items": [{ "label": "Partners", "value": 48, "suffix": "+" }] },
            { "type": "carousel", "title": "Formats", "items": ["Sprints"] },
            { "type": "rich_text", "html": "<p>hi</p>" },
            form_section(json!([{ "name": "email", "type": "email", "required": true }])),
        ]);

        let sections = parse_sections(&raw);
        assert_eq!(sections.len(), 5);
        assert!(matches!(sections[0], Section::Highlights { .. }));
        assert!(matches!(sections[1], Section::Stats { .. }));
        assert!(matches!(sections[2], Section::Carousel { .. }));
        assert!(matches!(sections[3], Section::RichText { .. }));
        assert!(matches!(sections[4], Section::FormQuestions { .. }));
    }

    #[test]
    fn unknown_and_malformed_elements_stay_in_place() {
        let raw = json!([
            { "type": "hologram", "items": [] },
            "not even an object",
            { "type": "rich_text", "html": "kept" },
        ]);

        let sections = parse_sections(&raw);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0], Section::Unknown);
        assert_eq!(sections[1], Section::Unknown);
        assert!(matches!(&sections[2], Section::RichText { html, .. } if html == "kept"));
    }

    #[test]
    fn non_array_documents_parse_to_nothing() {
        assert!(parse_sections(&json!({ "type": "stats" })).is_empty());
        assert!(parse_sections(&Value::Null).is_empty());
    }

    #[test]
    fn is_active_defaults_to_visible() {
        let sections = parse_sections(&json!([
            { "type": "highlights" },
            { "type": "stats", "is_active": false },
        ]));
        assert!(sections[0].is_visible());
        assert!(!sections[1].is_visible());
        assert!(!Section::Unknown.is_visible());
    }

    #[test]
    fn unrecognized_field_kind_degrades_to_text() {
        let sections = parse_sections(&json!([form_section(json!([
            { "name": "phone", "type": "tel", "required": true }
        ]))]));
        let Section::FormQuestions { fields } = &sections[0] else {
            panic!("expected form section");
        };
        assert_eq!(fields[0].kind, FieldKind::Text);
    }

    #[test]
    fn required_text_field_must_be_non_empty() {
        let sections = parse_sections(&json!([form_section(json!([
            { "name": "full_name", "required": true },
            { "name": "note", "required": false },
        ]))]));

        let mut payload = Map::new();
        payload.insert("full_name".to_string(), json!(""));
        let errors = required_field_errors(&sections, &payload, false);
        assert_eq!(errors, vec!["full_name is required.".to_string()]);

        payload.insert("full_name".to_string(), json!("Ada"));
        assert!(required_field_errors(&sections, &payload, false).is_empty());
    }

    #[test]
    fn required_file_field_needs_an_upload() {
        let sections = parse_sections(&json!([form_section(json!([
            { "name": "cv", "type": "file", "required": true }
        ]))]));

        let payload = Map::new();
        assert_eq!(
            required_field_errors(&sections, &payload, false),
            vec!["cv is required.".to_string()]
        );
        assert!(required_field_errors(&sections, &payload, true).is_empty());
    }

    #[test]
    fn nameless_required_fields_are_skipped() {
        let sections = parse_sections(&json!([form_section(json!([
            { "label": "Anonymous", "required": true }
        ]))]));
        assert!(required_field_errors(&sections, &Map::new(), false).is_empty());
    }

    #[test]
    fn typed_sections_round_trip_in_order() {
        let raw = json!([
            { "type": "stats", "is_active": true, "items": [] },
            form_section(json!([{ "name": "email", "type": "email", "required": true }])),
            { "type": "rich_text", "is_active": false, "html": "<p>soon</p>" },
        ]);

        let sections = parse_sections(&raw);
        let back = serde_json::to_value(&sections).unwrap();
        assert_eq!(parse_sections(&back), sections);
    }
}
