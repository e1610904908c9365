use crate::content::TestScoresSection;
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::RenderSection;

impl RenderSection for TestScoresSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let lines: String = self
            .list
            .iter()
            .map(|ts| {
                let year = ts
                    .year
                    .as_deref()
                    .map(|y| format!(" ({})", escape_text(y)))
                    .unwrap_or_default();
                format!(
                    "<div><strong>{}</strong> — {}{}</div>",
                    escape_text(&ts.test),
                    escape_text(&ts.score),
                    year
                )
            })
            .collect();
        format!("<div class=\"card\">{lines}</div>")
    }
}
