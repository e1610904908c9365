use crate::content::EducationSection;
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::RenderSection;

impl RenderSection for EducationSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let cards: String = self
            .items
            .iter()
            .map(|e| {
                format!(
                    "<div class=\"card\"><strong>{} — {}</strong><div class=\"muted\">{}</div><div>{}</div></div>",
                    escape_text(&e.degree),
                    escape_text(&e.institution),
                    escape_text(&e.period),
                    escape_text(&e.details)
                )
            })
            .collect();
        format!("<div>{cards}</div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_card_per_item_in_order() {
        let section: EducationSection = serde_json::from_value(json!({
            "items": [
                { "degree": "BSc", "institution": "A&M", "period": "2015" },
                { "degree": "MSc", "institution": "ETH" }
            ]
        }))
        .unwrap();
        let html = section.render_body(&mut RenderContext::default());
        assert_eq!(html.matches("class=\"card\"").count(), 2);
        assert!(html.contains("BSc — A&amp;M"));
        assert!(html.find("BSc").unwrap() < html.find("MSc").unwrap());
    }
}
