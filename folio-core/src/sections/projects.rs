//! Projects: a search box over a grid of collapsible project cards.

use crate::collapsible::{render_panel, render_toggle};
use crate::content::{ContentDocument, ProjectItem, ProjectsSection};
use crate::escape::escape_text;
use crate::highlight::{fold_case, highlight_matches};
use crate::renderer::RenderContext;

use super::{RenderSection, Section, external_link};

pub const NO_RESULTS: &str = "<div class=\"card no-results\">No projects found.</div>";

/// Case-folded text a query is matched against.
pub fn haystack(item: &ProjectItem) -> String {
    fold_case(&format!("{} {} {}", item.title, item.description, item.tags.join(" ")))
}

/// Whether `item` matches the trimmed, case-folded `query`. Empty matches all.
pub fn matches(item: &ProjectItem, query: &str) -> bool {
    let query = fold_case(query.trim());
    query.is_empty() || haystack(item).contains(&query)
}

/// Items matching `query`, in document order.
pub fn filter_projects<'a>(items: &'a [ProjectItem], query: &str) -> Vec<&'a ProjectItem> {
    items.iter().filter(|p| matches(p, query)).collect()
}

/// First sentence of the description.
pub fn snippet(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }
    let first = description.split('.').next().unwrap_or_default();
    format!("{first}.")
}

/// Grid contents for `items`, highlighting `query`.
///
/// An empty list renders a single placeholder card.
pub fn render_grid(items: &[&ProjectItem], query: &str, ctx: &mut RenderContext) -> String {
    if items.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut html = String::new();
    for (idx, p) in items.iter().enumerate() {
        html.push_str(&render_card(p, idx, query, ctx));
    }
    html
}

/// Filter `section` by `query` and render the grid contents.
pub fn render_filtered(section: &ProjectsSection, query: &str, ctx: &mut RenderContext) -> String {
    let query = query.trim();
    let items = filter_projects(&section.items, query);
    tracing::debug!(query, matched = items.len(), total = section.items.len(), "filtered projects");
    render_grid(&items, query, ctx)
}

/// Search the first projects section of `doc`, in navigation order.
///
/// `None` when the document has no projects section.
pub fn search_document(doc: &ContentDocument, query: &str, ctx: &mut RenderContext) -> Option<String> {
    doc.resolved_keys().into_iter().find_map(|key| {
        let value = doc.sections.get(key)?;
        match Section::resolve(key, value) {
            Section::Projects(section) => Some(render_filtered(&section, query, ctx)),
            _ => None,
        }
    })
}

fn render_card(p: &ProjectItem, idx: usize, query: &str, ctx: &mut RenderContext) -> String {
    let panel_id = ctx.panel_id("project", idx);

    let snippet = snippet(&p.description);
    let tags_json = serde_json::to_string(&p.tags).unwrap_or_else(|_| "[]".to_string());

    // Raw fields ride along so a static page can re-highlight without a server
    let mut html = format!(
        "<div class=\"project-item collapsible\" data-haystack=\"{}\" data-title=\"{}\" \
         data-subtitle=\"{}\" data-snippet=\"{}\" data-description=\"{}\" data-tags=\"{}\">\
         <strong data-field=\"title\">{}</strong><div class=\"muted\" data-field=\"subtitle\">{}</div>\
         <p data-field=\"snippet\">{}</p>",
        escape_text(&haystack(p)),
        escape_text(&p.title),
        escape_text(&p.subtitle),
        escape_text(&snippet),
        escape_text(&p.description),
        escape_text(&tags_json),
        highlight_matches(&p.title, query),
        highlight_matches(&p.subtitle, query),
        highlight_matches(&snippet, query)
    );

    if let Some(image) = &p.image {
        let alt = p.image_alt.as_deref().unwrap_or(&p.title);
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" style=\"max-width:100%;height:auto;border-radius:6px\">",
            escape_text(image),
            escape_text(alt)
        ));
    }

    let tags: String = p
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", highlight_matches(t, query)))
        .collect();
    let mut details = format!(
        "<div data-field=\"description\">{}</div><div class=\"project-tags\" data-field=\"tags\">{}</div>",
        highlight_matches(&p.description, query),
        tags
    );
    if let Some(link) = &p.link {
        details.push_str(&external_link(link, "View"));
    }

    html.push_str(&render_toggle("More", &panel_id));
    html.push_str(&render_panel(&panel_id, &details));
    html.push_str("</div>");
    html
}

impl RenderSection for ProjectsSection {
    fn render_body(&self, ctx: &mut RenderContext) -> String {
        let endpoint = ctx
            .search_endpoint
            .as_deref()
            .map(|e| format!(" data-search-endpoint=\"{}\"", escape_text(e)))
            .unwrap_or_default();

        let all: Vec<&ProjectItem> = self.items.iter().collect();
        format!(
            "<div class=\"controls\"><input type=\"search\" id=\"project-search\" \
             placeholder=\"Search projects by title, description or tag\" aria-label=\"Search projects\"></div>\
             <div class=\"projects-grid\" id=\"projects-grid\"{}>{}</div>",
            endpoint,
            render_grid(&all, "", ctx)
        )
    }
}
