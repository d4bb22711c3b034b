//! JSON content models and the HTML fragments rendered into each panel.

use std::fmt::Write;

use serde::{Deserialize, Deserializer};

use crate::gallery::GalleryItem;

pub const BIO_URL: &str = "data/bio.json";
pub const CERAMIC_INDEX_URL: &str = "data/ceramics/index.json";
pub const STATEMENT_INDEX_URL: &str = "data/statements/index.json";
pub const PROJECT_INDEX_URL: &str = "data/projects/index.json";

pub fn statement_detail_url(id: &str) -> String {
    format!("data/statements/{id}-statement.json")
}

/// Accepts `"2021"`, `2021` or `null`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectIndex {
    pub projects: Vec<ProjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub file: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BioText {
    pub main: String,
    pub detail: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub period: String,
    pub degree: String,
    pub institution: String,
    pub location: String,
}

/// Shared shape of exhibitions, awards, experiences and contributions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BioEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkEntry {
    pub period: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
    pub title: String,
    pub role: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bio {
    pub bio: BioText,
    pub education: Vec<Education>,
    pub exhibitions: Vec<BioEntry>,
    pub awards: Vec<BioEntry>,
    pub experiences: Vec<BioEntry>,
    pub artistic_contributions: Vec<BioEntry>,
    pub work: Vec<WorkEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ceramic {
    pub title: String,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
}

impl Ceramic {
    pub fn image_list(&self) -> Vec<&str> {
        match (&self.images, &self.image) {
            (Some(images), _) if !images.is_empty() => images.iter().map(String::as_str).collect(),
            (_, Some(image)) => vec![image.as_str()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementIndex {
    pub statements: Vec<StatementRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatementRef {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatementDetail {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap every run of ASCII digits in a number span.
pub fn wrap_numbers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits > 0 {
            let _ = write!(out, "<span class=\"number-span\">{}</span>", &rest[..digits]);
            rest = &rest[digits..];
            continue;
        }
        let plain = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        out.push_str(&escape_html(&rest[..plain]));
        rest = &rest[plain..];
    }
    out
}

fn entry_line(out: &mut String, entry: &BioEntry) {
    let _ = write!(
        out,
        "<p><strong>{}</strong>, {}",
        escape_html(entry.year.as_deref().unwrap_or_default()),
        escape_html(&entry.title)
    );
    if let Some(desc) = entry.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, ", {}", escape_html(desc));
    }
    if let Some(loc) = entry.location.as_deref() {
        let _ = write!(out, ", {}", escape_html(loc));
    }
    out.push_str("</p>");
}

fn entry_section(out: &mut String, heading: &str, entries: &[BioEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = write!(out, "<div class=\"bio-section\"><h3>{heading}</h3>");
    for entry in entries {
        entry_line(out, entry);
    }
    out.push_str("</div>");
}

pub fn render_bio(bio: &Bio) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class=\"bio-main\"><p>{}</p><p>{}</p><p>{}</p></div>",
        escape_html(&bio.bio.main),
        escape_html(&bio.bio.detail),
        escape_html(&bio.bio.conclusion)
    );

    if !bio.education.is_empty() {
        html.push_str("<div class=\"bio-section\"><h3>Education</h3>");
        for edu in &bio.education {
            let _ = write!(
                html,
                "<p><strong>{}</strong>, {}, {}, {}</p>",
                escape_html(&edu.period),
                escape_html(&edu.degree),
                escape_html(&edu.institution),
                escape_html(&edu.location)
            );
        }
        html.push_str("</div>");
    }

    entry_section(&mut html, "Group Exhibitions", &bio.exhibitions);
    entry_section(&mut html, "Awards, Grants, Projects, Performances", &bio.awards);
    entry_section(&mut html, "Experiences", &bio.experiences);
    entry_section(&mut html, "Artistic Contributions", &bio.artistic_contributions);

    if !bio.work.is_empty() {
        html.push_str("<div class=\"bio-section\"><h3>Work</h3>");
        for work in &bio.work {
            let period = work.period.as_deref().or(work.year.as_deref()).unwrap_or_default();
            let _ = write!(
                html,
                "<p><strong>{}</strong>, {}, {}",
                escape_html(period),
                escape_html(&work.title),
                escape_html(&work.role)
            );
            if let Some(loc) = work.location.as_deref() {
                let _ = write!(html, ", {}", escape_html(loc));
            }
            html.push_str("</p>");
        }
        html.push_str("</div>");
    }
    html
}

pub fn render_ceramic_grid(ceramics: &[Ceramic]) -> String {
    let mut html = String::new();
    for (index, ceramic) in ceramics.iter().enumerate() {
        let images = ceramic.image_list();
        let Some(first) = images.first() else {
            log::warn!("ceramic {index} ({:?}) has no images", ceramic.title);
            continue;
        };
        let title = escape_html(&ceramic.title);
        let _ = write!(
            html,
            "<div class=\"ceramic-item\" data-ceramic-index=\"{index}\">\
             <div class=\"ceramic-gallery\">\
             <img src=\"{}\" alt=\"{title}\" class=\"ceramic-image active\" data-image-index=\"0\">",
            escape_html(first)
        );
        if images.len() > 1 {
            let _ = write!(
                html,
                "<button class=\"ceramic-nav-btn prev\" data-ceramic-index=\"{index}\" data-direction=\"-1\">‹</button>\
                 <button class=\"ceramic-nav-btn next\" data-ceramic-index=\"{index}\" data-direction=\"1\">›</button>"
            );
        }
        let _ = write!(
            html,
            "</div><div class=\"ceramic-info\"><h3>{title}</h3></div></div>"
        );
    }
    html
}

pub fn render_statement_list(index: &StatementIndex) -> String {
    let mut html = String::new();
    for statement in &index.statements {
        let has_number = statement.title.chars().any(|c| c.is_ascii_digit());
        let class = if has_number { "number-fix" } else { "" };
        let _ = write!(
            html,
            "<div class=\"statement-item\" data-statement-id=\"{}\"><h3 class=\"{class}\">{}</h3></div>",
            escape_html(&statement.id),
            wrap_numbers(&statement.title)
        );
    }
    html
}

pub fn render_statement_detail(detail: &StatementDetail) -> String {
    let mut html = String::from(
        "<div class=\"statement-detail\"><button class=\"back-to-statements\">← Back to Statements</button>",
    );
    let _ = write!(html, "<h2>{}</h2>", wrap_numbers(&detail.title));
    for paragraph in &detail.content {
        let _ = write!(html, "<p>{}</p>", wrap_numbers(paragraph));
    }
    html.push_str("</div>");
    html
}

/// Two-column description block of the project detail view.
pub fn render_project_detail(item: &GalleryItem) -> String {
    let na = |v: &Option<String>| escape_html(v.as_deref().unwrap_or("N/A"));
    let mut html = String::from(
        "<div class=\"project-detail-grid\"><div class=\"project-info-left\"><div class=\"project-basic-info\">",
    );
    let kind = if item.is_group_project() { "Group Project" } else { "Individual Project" };
    let _ = write!(html, "<p><strong>{kind}</strong></p><p><strong>Interactive installation</strong></p>");
    let _ = write!(html, "<p>{}</p>", na(&item.medium));
    let _ = write!(html, "<p><strong>{} / {}</strong></p>", na(&item.year), na(&item.location));
    if let Some(exhibition) = item.exhibition.as_deref().filter(|e| !e.is_empty()) {
        let _ = write!(
            html,
            "<p><strong>Exhibited at</strong></p><p><strong>{}</strong></p>",
            escape_html(exhibition)
        );
    }
    html.push_str("</div></div><div class=\"project-info-right\">");

    let paragraphs = [
        &item.detail,
        &item.technical_detail,
        &item.conceptual_detail,
        &item.conclusion,
    ];
    for text in paragraphs.into_iter().flatten().filter(|t| !t.is_empty()) {
        let _ = write!(html, "<p>{}</p>", escape_html(text));
    }
    let credits = [
        ("Photography", &item.photography),
        ("Videography", &item.videography),
        ("Collaboration", &item.collaboration),
    ];
    for (label, value) in credits {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(html, "<p><strong>{label}:</strong> {}</p>", escape_html(value));
        }
    }
    html.push_str("</div></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_numbers_spans_digit_runs() {
        assert_eq!(
            wrap_numbers("Part 12 & 3"),
            "Part <span class=\"number-span\">12</span> &amp; <span class=\"number-span\">3</span>"
        );
        assert_eq!(wrap_numbers("it's"), "it&#39;s");
    }

    #[test]
    fn ceramic_prefers_image_list() {
        let single: Ceramic = serde_json::from_str(r#"{"title":"Bowl","image":"a.jpg"}"#).unwrap();
        assert_eq!(single.image_list(), vec!["a.jpg"]);
        let many: Ceramic =
            serde_json::from_str(r#"{"title":"Vase","images":["b.jpg","c.jpg"]}"#).unwrap();
        assert_eq!(many.image_list(), vec!["b.jpg", "c.jpg"]);
    }

    #[test]
    fn ceramic_buttons_only_for_multiple_images() {
        let ceramics: Vec<Ceramic> = serde_json::from_str(
            r#"[{"title":"Bowl","image":"a.jpg"},{"title":"Vase","images":["b.jpg","c.jpg"]}]"#,
        )
        .unwrap();
        let html = render_ceramic_grid(&ceramics);
        assert_eq!(html.matches("ceramic-nav-btn prev").count(), 1);
        assert!(html.contains("data-ceramic-index=\"1\" data-direction=\"-1\""));
    }

    #[test]
    fn bio_sections_skip_empty_lists() {
        let bio: Bio = serde_json::from_str(
            r#"{
                "bio": {"main": "M", "detail": "D", "conclusion": "C"},
                "education": [{"period": "2018-2022", "degree": "BFA", "institution": "U", "location": "Seoul"}],
                "awards": [{"year": 2023, "title": "Prize", "location": "Busan"}],
                "work": [{"year": "2024", "title": "Studio", "role": "Assistant"}]
            }"#,
        )
        .unwrap();
        let html = render_bio(&bio);
        assert!(html.contains("<h3>Education</h3>"));
        assert!(html.contains("<p><strong>2023</strong>, Prize, Busan</p>"));
        assert!(html.contains("<p><strong>2024</strong>, Studio, Assistant</p>"));
        assert!(!html.contains("Group Exhibitions"));
        assert!(!html.contains("Experiences"));
    }

    #[test]
    fn project_detail_credits() {
        let item = GalleryItem {
            title: "Tide".into(),
            images: vec!["t.jpg".into()],
            medium: Some("Projection".into()),
            year: Some("2024".into()),
            photography: Some("Kim".into()),
            dimensions: Some("team".into()),
            ..Default::default()
        };
        let html = render_project_detail(&item);
        assert!(html.contains("Group Project"));
        assert!(html.contains("<p><strong>2024 / N/A</strong></p>"));
        assert!(html.contains("<strong>Photography:</strong> Kim"));
        assert!(!html.contains("Exhibited at"));
        assert!(!html.contains("Videography"));
    }
}
