//! Built-in marketing pages shipped with the product. They act as the
//! render fallback when the backend has no row for a slug yet, and as the
//! base that live section data is merged over.

use serde_json::json;

use super::{CarouselContent, FormContent, Hero, PageContent, PageMeta};
use crate::sections::{FieldKind, FormField, HighlightItem, StatItem};

pub fn catalog() -> Vec<PageContent> {
    vec![internships(), cohosted_programs(), custom_training()]
}

pub fn find_page(key: &str) -> Option<PageContent> {
    catalog().into_iter().find(|entry| entry.key == key)
}

fn field(name: &str, label: &str, kind: FieldKind, required: bool) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind,
        required,
        options: None,
        placeholder: None,
    }
}

fn internships() -> PageContent {
    PageContent {
        key: "industry-internships".to_string(),
        path: "/industry-internships".to_string(),
        label: "Industry Internships".to_string(),
        slug: "industry-internships".to_string(),
        hero: Hero {
            kicker: "Internships with real teams".to_string(),
            title: "Industry internships that ship real work".to_string(),
            subtitle: "Join partner companies and work on live briefs with mentorship and portfolio-ready results.".to_string(),
            background: "internships".to_string(),
        },
        stats: vec![
            stat("Active partners", json!(48), "+"),
            stat("Open roles", json!(160), "+"),
            stat("Avg. placement", json!(86), "%"),
        ],
        highlights: vec![
            highlight("Live project briefs", "Every internship starts with a scoped brief and success metrics agreed with the partner."),
            highlight("Mentor guidance", "Weekly check-ins with industry mentors, reviews, and deliverable feedback."),
            highlight("Verified outcomes", "Each internship ends with a verified work summary and skills validation."),
        ],
        carousel: CarouselContent {
            title: "What partners request most".to_string(),
            items: vec![
                "Frontend feature delivery with QA handoff".to_string(),
                "API integrations and release checklists".to_string(),
                "Design system contributions".to_string(),
            ],
        },
        rich_text: String::new(),
        form: FormContent {
            title: "Apply for an internship".to_string(),
            description: "Share your background and upload your latest CV.".to_string(),
            fields: vec![
                field("full_name", "Full name", FieldKind::Text, true),
                field("email", "Email", FieldKind::Email, true),
                FormField {
                    options: Some(vec![
                        "Frontend".to_string(),
                        "Backend".to_string(),
                        "Full-stack".to_string(),
                        "QA".to_string(),
                    ]),
                    ..field("track", "Preferred track", FieldKind::Select, true)
                },
                field("cv", "Upload CV", FieldKind::File, true),
                field("note", "Why SkillForge?", FieldKind::Textarea, false),
            ],
        },
        meta: PageMeta {
            title: "Industry Internships | SkillForge".to_string(),
            description: "Apply to industry internships with real briefs, mentorship, and portfolio-ready outcomes.".to_string(),
            schema_type: "Course".to_string(),
        },
    }
}

fn cohosted_programs() -> PageContent {
    PageContent {
        key: "co-hosted-programs".to_string(),
        path: "/co-hosted-programs".to_string(),
        label: "Co-Hosted Programs".to_string(),
        slug: "co-hosted-programs".to_string(),
        hero: Hero {
            kicker: "Academia x industry".to_string(),
            title: "Co-hosted programs with verified outcomes".to_string(),
            subtitle: "Run semester-long programs with measurable learning outcomes and employer-aligned rubrics.".to_string(),
            background: "cohosted".to_string(),
        },
        stats: vec![
            stat("University partners", json!(24), "+"),
            stat("Program modules", json!(52), "+"),
            stat("Mentor hours", json!(3800), "+"),
        ],
        highlights: vec![
            highlight("Shared curriculum", "Blend faculty expertise with partner projects for live assignments."),
            highlight("Assessment rubrics", "Rubrics mapped to industry competencies and skills badges."),
            highlight("Placement pipeline", "Top learners progress into internships or partner interviews."),
        ],
        carousel: CarouselContent {
            title: "Program formats".to_string(),
            items: vec![
                "Semester capstone studios".to_string(),
                "Short sprints for employers".to_string(),
                "Career launch cohorts".to_string(),
            ],
        },
        rich_text: String::new(),
        form: FormContent {
            title: "Plan a co-hosted program".to_string(),
            description: "Tell us about your institution or company and goals.".to_string(),
            fields: vec![
                field("organization", "Organization name", FieldKind::Text, true),
                field("contact", "Contact person", FieldKind::Text, true),
                field("email", "Email", FieldKind::Email, true),
                field("cohort_size", "Expected cohort size", FieldKind::Number, true),
                field("notes", "Program goals", FieldKind::Textarea, false),
            ],
        },
        meta: PageMeta {
            title: "Co-Hosted Programs | SkillForge".to_string(),
            description: "Launch co-hosted education programs with SkillForge and industry partners.".to_string(),
            schema_type: "Organization".to_string(),
        },
    }
}

fn custom_training() -> PageContent {
    PageContent {
        key: "custom-training".to_string(),
        path: "/custom-training".to_string(),
        label: "Custom Training".to_string(),
        slug: "custom-training".to_string(),
        hero: Hero {
            kicker: "Upskilling that sticks".to_string(),
            title: "Custom training built around your roadmap".to_string(),
            subtitle: "Curriculum designed with your leads, delivered in cohorts, measured against your own definition of done.".to_string(),
            background: "training".to_string(),
        },
        stats: vec![
            stat("Teams trained", json!(90), "+"),
            stat("Completion rate", json!(94), "%"),
            stat("Tracks available", json!(18), "+"),
        ],
        highlights: vec![
            highlight("Roadmap-first design", "We scope modules against the work your team ships next quarter."),
            highlight("Cohort delivery", "Small groups, project work, and reviews instead of passive video."),
            highlight("Outcome reports", "Per-learner progress and a capstone artifact for every cohort."),
        ],
        carousel: CarouselContent {
            title: "Recently delivered".to_string(),
            items: vec![
                "Cloud migration bootcamp".to_string(),
                "Accessibility deep-dive".to_string(),
                "Data pipeline fundamentals".to_string(),
            ],
        },
        rich_text: String::new(),
        form: FormContent {
            title: "Request a training plan".to_string(),
            description: "Describe your team and the skills gap to close.".to_string(),
            fields: vec![
                field("company", "Company", FieldKind::Text, true),
                field("email", "Work email", FieldKind::Email, true),
                field("team_size", "Team size", FieldKind::Number, true),
                field("goals", "Training goals", FieldKind::Textarea, true),
            ],
        },
        meta: PageMeta {
            title: "Custom Training | SkillForge".to_string(),
            description: "Cohort-based custom training programs designed around your delivery roadmap.".to_string(),
            schema_type: "Organization".to_string(),
        },
    }
}

fn stat(label: &str, value: serde_json::Value, suffix: &str) -> StatItem {
    StatItem {
        label: label.to_string(),
        value,
        suffix: suffix.to_string(),
    }
}

fn highlight(title: &str, text: &str) -> HighlightItem {
    HighlightItem {
        title: title.to_string(),
        text: text.to_string(),
    }
}
