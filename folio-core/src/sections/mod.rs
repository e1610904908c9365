//! Section renderers, one per content kind.
//!
//! Each section's raw JSON is resolved into a [`Section`] variant, then
//! rendered through [`RenderSection`]. Kinds nobody knows about render as a
//! pretty-printed dump of their data rather than failing.

mod cards;
mod contact;
mod education;
mod home;
pub mod projects;
mod research;
mod testscores;

use serde_json::Value;

use crate::content::{
    CardsSection, ContactSection, EducationSection, HomeSection, MiscSection, ProjectsSection,
    ResearchSection, SectionMeta, TestScoresSection,
};
use crate::escape::escape_text;
use crate::renderer::RenderContext;
use crate::reveal::RevealStyle;

pub use projects::{filter_projects, render_grid, search_document};

/// Renders the body of one kind of section.
pub trait RenderSection {
    fn render_body(&self, ctx: &mut RenderContext) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Home,
    Education,
    Research,
    Projects,
    TestScores,
    Cards,
    Miscellaneous,
    Contact,
    Unknown,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "home" => SectionKind::Home,
            "education" => SectionKind::Education,
            "research" => SectionKind::Research,
            "projects" => SectionKind::Projects,
            "testscores" | "test-scores" | "test_scores" => SectionKind::TestScores,
            "hobbies" | "travelling" | "traveling" => SectionKind::Cards,
            "miscellaneous" | "misc" => SectionKind::Miscellaneous,
            "contact" => SectionKind::Contact,
            _ => SectionKind::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Section {
    Home(HomeSection),
    Education(EducationSection),
    Research(ResearchSection),
    Projects(ProjectsSection),
    TestScores(TestScoresSection),
    Cards(CardsSection),
    Miscellaneous(MiscSection),
    Contact(ContactSection),
    Unknown { meta: SectionMeta, raw: Value },
}

impl Section {
    /// Resolve raw section data stored under `key`.
    ///
    /// The kind comes from `meta.kind` when present, otherwise from the key.
    /// Data that does not fit its kind degrades to [`Section::Unknown`].
    pub fn resolve(key: &str, value: &Value) -> Self {
        let kind_name = value
            .get("meta")
            .and_then(|m| m.get("kind"))
            .and_then(Value::as_str)
            .unwrap_or(key);

        let kind = SectionKind::from_name(kind_name);
        match Self::typed(kind, value) {
            Ok(section) => section,
            Err(e) => {
                tracing::warn!(section = key, error = %e, "section data does not match its kind");
                Self::unknown(value)
            }
        }
    }

    fn typed(kind: SectionKind, value: &Value) -> Result<Self, serde_json::Error> {
        let v = || value.clone();
        Ok(match kind {
            SectionKind::Home => Section::Home(serde_json::from_value(v())?),
            SectionKind::Education => Section::Education(serde_json::from_value(v())?),
            SectionKind::Research => Section::Research(serde_json::from_value(v())?),
            SectionKind::Projects => Section::Projects(serde_json::from_value(v())?),
            SectionKind::TestScores => Section::TestScores(serde_json::from_value(v())?),
            SectionKind::Cards => Section::Cards(serde_json::from_value(v())?),
            SectionKind::Miscellaneous => Section::Miscellaneous(serde_json::from_value(v())?),
            SectionKind::Contact => Section::Contact(serde_json::from_value(v())?),
            SectionKind::Unknown => Self::unknown(value),
        })
    }

    fn unknown(value: &Value) -> Self {
        let meta = value
            .get("meta")
            .cloned()
            .and_then(|m| serde_json::from_value(m).ok())
            .unwrap_or_default();
        Section::Unknown {
            meta,
            raw: value.clone(),
        }
    }

    pub fn meta(&self) -> &SectionMeta {
        match self {
            Section::Home(s) => &s.meta,
            Section::Education(s) => &s.meta,
            Section::Research(s) => &s.meta,
            Section::Projects(s) => &s.meta,
            Section::TestScores(s) => &s.meta,
            Section::Cards(s) => &s.meta,
            Section::Miscellaneous(s) => &s.meta,
            Section::Contact(s) => &s.meta,
            Section::Unknown { meta, .. } => meta,
        }
    }

    /// Display title, falling back to the section key.
    pub fn title<'a>(&'a self, key: &'a str) -> &'a str {
        let title = self.meta().title.as_str();
        if title.is_empty() { key } else { title }
    }
}

impl RenderSection for Section {
    fn render_body(&self, ctx: &mut RenderContext) -> String {
        match self {
            Section::Home(s) => s.render_body(ctx),
            Section::Education(s) => s.render_body(ctx),
            Section::Research(s) => s.render_body(ctx),
            Section::Projects(s) => s.render_body(ctx),
            Section::TestScores(s) => s.render_body(ctx),
            Section::Cards(s) => s.render_body(ctx),
            Section::Miscellaneous(s) => s.render_body(ctx),
            Section::Contact(s) => s.render_body(ctx),
            Section::Unknown { raw, .. } => {
                let dump = serde_json::to_string_pretty(raw).unwrap_or_default();
                format!("<pre class=\"card\">{}</pre>", escape_text(&dump))
            }
        }
    }
}

/// Render a whole `<section>` for `key`, header included.
pub fn render_section(key: &str, section: &Section, ctx: &mut RenderContext) -> String {
    let body = section.render_body(ctx);
    section_shell(key, section.title(key), &body, ctx)
}

/// The section shown when a page asks for a key the document does not have.
pub fn render_not_found(key: &str, ctx: &mut RenderContext) -> String {
    let body = format!(
        "<div class=\"card not-found\">No content found for &ldquo;{}&rdquo;. Check the content document.</div>",
        escape_text(key)
    );
    section_shell(key, key, &body, ctx)
}

fn section_shell(key: &str, title: &str, body: &str, ctx: &mut RenderContext) -> String {
    let index = ctx.next_section_index();
    let visible = if ctx.reveal == RevealStyle::None { " in-view" } else { "" };
    format!(
        "<section id=\"{}\" tabindex=\"-1\" class=\"content-section{}\" data-reveal=\"{}\"{}>\
         <div class=\"section-title\"><h2>{}</h2></div>\
         <div class=\"section-body\">{}</div></section>\n",
        escape_text(key),
        visible,
        ctx.reveal.as_str(),
        ctx.reveal.delay_style(index),
        escape_text(title),
        body
    )
}

/// Trailing external link used by research and project panels.
pub(crate) fn external_link(href: &str, label: &str) -> String {
    format!(
        "<div style=\"margin-top:8px\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></div>",
        escape_text(href),
        escape_text(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_key_and_meta() {
        assert!(matches!(Section::resolve("home", &json!({})), Section::Home(_)));
        assert!(matches!(
            Section::resolve("travelling", &json!({ "places": [] })),
            Section::Cards(_)
        ));
        assert!(matches!(
            Section::resolve("side-projects", &json!({ "meta": { "kind": "projects" } })),
            Section::Projects(_)
        ));
    }

    #[test]
    fn test_unknown_kind_dumps_escaped_data() {
        let section = Section::resolve("awards", &json!({ "meta": { "title": "Awards" }, "x": "<b>" }));
        let html = render_section("awards", &section, &mut RenderContext::default());
        assert!(html.contains("<h2>Awards</h2>"));
        assert!(html.contains("<pre class=\"card\">"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_mismatched_data_degrades_to_dump() {
        let section = Section::resolve("education", &json!({ "items": "not a list" }));
        assert!(matches!(section, Section::Unknown { .. }));
    }

    #[test]
    fn test_title_falls_back_to_key() {
        let section = Section::resolve("home", &json!({ "intro": "hi" }));
        let html = render_section("home", &section, &mut RenderContext::default());
        assert!(html.contains("<h2>home</h2>"));
        assert!(html.contains("id=\"home\""));
    }

    #[test]
    fn test_reveal_none_marks_sections_visible() {
        let mut ctx = RenderContext::new(Default::default(), RevealStyle::None);
        let html = render_not_found("ghost", &mut ctx);
        assert!(html.contains("class=\"content-section in-view\""));
        assert!(html.contains("not-found"));
    }
}
