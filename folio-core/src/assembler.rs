//! Turns a content document into a [`HostPage`].

use serde_json::Value;

use crate::content::{ContentDocument, Layout, SiteMeta};
use crate::escape::escape_text;
use crate::fallback::render_fallback;
use crate::host::{HostPage, NavItem, PageMeta, PageState};
use crate::renderer::RenderContext;
use crate::reveal::RevealStyle;
use crate::sections::{Section, render_not_found, render_section};
use crate::source::ContentSource;

const DEFAULT_TITLE: &str = "Profile";
const DEFAULT_IMAGE: &str = "assets/profile.svg";
const DEFAULT_LOGO: &str = "assets/logo.svg";
const DEFAULT_BRAND_TITLE: &str = "Your Name";

pub enum LoadOutcome {
    Ready(ContentDocument),
    /// Loading failed and the fallback page was rendered instead.
    Failed(HostPage),
}

#[derive(Debug, Clone, Default)]
pub struct PageAssembler {
    layout: Option<Layout>,
    reveal: RevealStyle,
    search_endpoint: Option<String>,
}

impl PageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a layout instead of the one named by the document.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn reveal(mut self, reveal: RevealStyle) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    pub fn layout_for(&self, doc: &ContentDocument) -> Layout {
        self.layout.or(doc.site.layout).unwrap_or_default()
    }

    pub fn context_for(&self, doc: &ContentDocument) -> RenderContext {
        let ctx = RenderContext::new(self.layout_for(doc), self.reveal);
        match &self.search_endpoint {
            Some(endpoint) => ctx.with_search_endpoint(endpoint.clone()),
            None => ctx,
        }
    }

    /// Fetch the content document once. On any failure the fallback page is
    /// rendered and nothing else happens: no retry, no partial render.
    pub async fn load(&self, source: &dyn ContentSource) -> LoadOutcome {
        match source.load().await {
            Ok(doc) => {
                tracing::info!(
                    source = %source.describe(),
                    sections = doc.sections.len(),
                    "loaded content document"
                );
                LoadOutcome::Ready(doc)
            }
            Err(e) => LoadOutcome::Failed(render_fallback(&e)),
        }
    }

    /// Load and render a single page in one go.
    pub async fn assemble(&self, source: &dyn ContentSource, page_id: Option<&str>) -> HostPage {
        match self.load(source).await {
            LoadOutcome::Ready(doc) => self.render(&doc, page_id),
            LoadOutcome::Failed(page) => page,
        }
    }

    pub fn render(&self, doc: &ContentDocument, page_id: Option<&str>) -> HostPage {
        let mut ctx = self.context_for(doc);
        self.render_with(doc, page_id, &mut ctx)
    }

    /// Render a page using a caller-owned context.
    ///
    /// Single-page layouts render every section in navigation order and
    /// ignore `page_id`. Multi-page layouts render only the section for
    /// `page_id` (the first navigation key when absent); a key the document
    /// lacks gets a not-found notice in place of that section.
    pub fn render_with(
        &self,
        doc: &ContentDocument,
        page_id: Option<&str>,
        ctx: &mut RenderContext,
    ) -> HostPage {
        let layout = ctx.layout;
        let keys = doc.resolved_keys();

        let page_id = match layout {
            Layout::SinglePage => None,
            Layout::MultiPage => page_id
                .map(str::to_string)
                .or_else(|| keys.first().map(|k| k.to_string())),
        };

        let mut content = String::new();
        let mut sections = Vec::new();
        let targets: Vec<&str> = match &page_id {
            None => keys.clone(),
            Some(id) => vec![id.as_str()],
        };

        for key in targets {
            match doc.sections.get(key) {
                Some(value) => {
                    let section = Section::resolve(key, value);
                    content.push_str(&render_section(key, &section, ctx));
                    sections.push(key.to_string());
                }
                None => {
                    tracing::warn!(section = key, "page asks for a section the document lacks");
                    content.push_str(&render_not_found(key, ctx));
                }
            }
        }

        let nav = navigation(doc, layout);
        HostPage {
            meta: page_meta(&doc.site),
            brand: brand_html(
                doc.site.logo.as_deref().unwrap_or(DEFAULT_LOGO),
                non_empty(&doc.site.title).unwrap_or(DEFAULT_BRAND_TITLE),
                &doc.site.subtitle,
            ),
            nav: nav_html(&nav, page_id.as_deref()),
            content,
            footer: footer_html(&doc.site),
            page_id,
            sections,
            state: PageState::Rendered,
        }
    }
}

/// Navigation entries in order, skipping keys absent from `sections`.
///
/// Multi-page layouts also skip keys that cannot be a page path unless the
/// entry brings its own `href`.
pub fn navigation(doc: &ContentDocument, layout: Layout) -> Vec<NavItem> {
    doc.resolved_keys()
        .into_iter()
        .enumerate()
        .filter_map(|(idx, key)| {
            let entry = doc.nav_entry(key);
            let text = entry
                .and_then(|e| e.title())
                .map(str::to_string)
                .or_else(|| doc.sections.get(key).and_then(section_title))
                .unwrap_or_else(|| key.to_string());

            let link = match (layout, entry.and_then(|e| e.href())) {
                (Layout::SinglePage, _) => format!("#{key}"),
                (Layout::MultiPage, Some(href)) => href.to_string(),
                (Layout::MultiPage, None) if idx == 0 => "/".to_string(),
                (Layout::MultiPage, None) if is_plain_segment(key) => format!("/{key}/"),
                (Layout::MultiPage, None) => return None,
            };

            Some(NavItem {
                key: key.to_string(),
                text,
                link,
            })
        })
        .collect()
}

/// Non-empty `meta.title` of raw section data, read leniently.
fn section_title(value: &Value) -> Option<String> {
    let title = match value.get("meta")?.get("title")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!title.is_empty()).then_some(title)
}

/// Whether `key` can name a page directory: one plain path component.
pub(crate) fn is_plain_segment(key: &str) -> bool {
    !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\'])
}

fn nav_html(items: &[NavItem], current: Option<&str>) -> String {
    let links: String = items
        .iter()
        .map(|item| {
            let active = if current == Some(item.key.as_str()) {
                " class=\"active\" aria-current=\"page\""
            } else {
                ""
            };
            format!(
                "<a href=\"{}\"{}>{}</a>",
                escape_text(&item.link),
                active,
                escape_text(&item.text)
            )
        })
        .collect();
    format!("<div class=\"nav-list\">{links}</div>")
}

fn page_meta(site: &SiteMeta) -> PageMeta {
    PageMeta {
        title: non_empty(&site.title).unwrap_or(DEFAULT_TITLE).to_string(),
        description: site.description.clone(),
        image: site.image.as_deref().unwrap_or(DEFAULT_IMAGE).to_string(),
    }
}

pub(crate) fn brand_html(logo: &str, title: &str, subtitle: &str) -> String {
    format!(
        "<div class=\"logo\" style=\"background-image:url('{}')\" role=\"img\" aria-label=\"Logo\"></div>\
         <div><div class=\"title\">{}</div><div class=\"subtitle\">{}</div></div>",
        escape_text(logo),
        escape_text(title),
        escape_text(subtitle)
    )
}

fn footer_html(site: &SiteMeta) -> String {
    format!(
        "<div>{} · {}</div><div>{}</div>",
        escape_text(&site.title),
        escape_text(&site.tagline),
        escape_text(&site.copyright)
    )
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    const DOC: &str = r#"{
        "site": {
            "title": "Ada <Lovelace>",
            "subtitle": "Engineer",
            "tagline": "Notes & code",
            "copyright": "© 2026",
            "navOrder": ["home", "missing", "projects", "research"]
        },
        "sections": {
            "research": { "meta": { "title": "Research" }, "items": [ { "title": "Engines" } ] },
            "home": { "meta": { "title": "Home" }, "intro": "Hello" },
            "projects": { "meta": { "title": "Projects" }, "items": [] },
            "hobbies": { "meta": { "title": "Hobbies" }, "items": [] }
        }
    }"#;

    fn doc() -> ContentDocument {
        ContentDocument::from_json(DOC).unwrap()
    }

    #[test]
    fn test_nav_follows_nav_order_exactly() {
        let nav = navigation(&doc(), Layout::SinglePage);
        let keys: Vec<_> = nav.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["home", "projects", "research"]);
        assert_eq!(nav[1].link, "#projects");
        assert_eq!(nav[1].text, "Projects");
    }

    #[test]
    fn test_multi_page_links() {
        let nav = navigation(&doc(), Layout::MultiPage);
        let links: Vec<_> = nav.iter().map(|n| n.link.as_str()).collect();
        assert_eq!(links, vec!["/", "/projects/", "/research/"]);
    }

    #[test]
    fn test_multi_page_nav_skips_keys_without_a_page() {
        let doc = ContentDocument::from_json(
            r#"{
                "site": { "navOrder": ["home", "../etc", "a/b", "notes"] },
                "sections": {
                    "home": { "meta": { "title": 7 } },
                    "../etc": { "meta": { "title": "Escape" } },
                    "a/b": {},
                    "notes": { "meta": { "title": "" } }
                }
            }"#,
        )
        .unwrap();

        let multi = navigation(&doc, Layout::MultiPage);
        let links: Vec<_> = multi.iter().map(|n| n.link.as_str()).collect();
        assert_eq!(links, vec!["/", "/notes/"]);
        assert_eq!(multi[0].text, "7");
        assert_eq!(multi[1].text, "notes");

        assert_eq!(navigation(&doc, Layout::SinglePage).len(), 4);
    }

    #[test]
    fn test_single_page_renders_sections_in_nav_order() {
        let page = PageAssembler::new().render(&doc(), None);
        assert_eq!(page.sections, vec!["home", "projects", "research"]);
        let home = page.content.find("id=\"home\"").unwrap();
        let research = page.content.find("id=\"research\"").unwrap();
        assert!(home < research);
        assert!(!page.content.contains("id=\"hobbies\""));
        assert_eq!(page.state, PageState::Rendered);
    }

    #[test]
    fn test_meta_brand_and_footer() {
        let page = PageAssembler::new().render(&doc(), None);
        assert_eq!(page.meta.title, "Ada <Lovelace>");
        assert_eq!(page.meta.image, DEFAULT_IMAGE);
        assert!(page.brand.contains("Ada &lt;Lovelace&gt;"));
        assert!(page.brand.contains(DEFAULT_LOGO));
        assert_eq!(
            page.footer,
            "<div>Ada &lt;Lovelace&gt; · Notes &amp; code</div><div>© 2026</div>"
        );
    }

    #[test]
    fn test_multi_page_renders_one_section() {
        let assembler = PageAssembler::new().layout(Layout::MultiPage);
        let page = assembler.render(&doc(), Some("research"));
        assert_eq!(page.sections, vec!["research"]);
        assert_eq!(page.page_id.as_deref(), Some("research"));
        assert!(page.nav.contains("href=\"/research/\" class=\"active\""));

        let landing = assembler.render(&doc(), None);
        assert_eq!(landing.page_id.as_deref(), Some("home"));
    }

    #[test]
    fn test_multi_page_missing_key_renders_not_found_only_there() {
        let page = PageAssembler::new()
            .layout(Layout::MultiPage)
            .render(&doc(), Some("missing"));
        assert!(page.sections.is_empty());
        assert!(page.content.contains("not-found"));
        assert!(!page.is_fallback());
        assert!(page.nav.contains("nav-list"));
    }

    #[tokio::test]
    async fn test_failed_load_renders_fallback_and_no_sections() {
        let page = PageAssembler::new()
            .assemble(&StaticSource::failing("network down"), None)
            .await;
        assert!(page.is_fallback());
        assert!(page.sections.is_empty());
        assert!(!page.content.contains("content-section"));
    }

    #[tokio::test]
    async fn test_successful_load_renders() {
        let page = PageAssembler::new()
            .assemble(&StaticSource::document(doc()), None)
            .await;
        assert!(!page.is_fallback());
        assert_eq!(page.sections.len(), 3);
    }
}
