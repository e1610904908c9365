use crate::collapsible::{render_panel, render_toggle};
use crate::content::ResearchSection;
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::{RenderSection, external_link};

impl RenderSection for ResearchSection {
    fn render_body(&self, ctx: &mut RenderContext) -> String {
        let mut html = String::from("<div class=\"research-list\">");

        for (idx, r) in self.items.iter().enumerate() {
            let panel_id = ctx.panel_id("research", idx);

            let mut details = format!("<div>{}</div>", escape_text(&r.summary));
            if let Some(link) = &r.link {
                details.push_str(&external_link(link, "Read more"));
            }

            html.push_str(&format!(
                "<div class=\"card collapsible\"><strong>{}</strong><div class=\"muted\">{} {}</div>{}{}</div>",
                escape_text(&r.title),
                escape_text(&r.role),
                escape_text(&r.period),
                render_toggle("Details", &panel_id),
                render_panel(&panel_id, &details)
            ));
        }

        html.push_str("</div>");
        html
    }
}
