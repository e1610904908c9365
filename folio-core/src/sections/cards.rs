use crate::content::{CardsSection, MiscSection};
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::RenderSection;

impl RenderSection for CardsSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let cards: String = self
            .items
            .iter()
            .map(|c| {
                format!(
                    "<div class=\"card col\"><strong>{}</strong><div class=\"muted\">{}</div><div>{}</div></div>",
                    escape_text(&c.name),
                    escape_text(&c.year),
                    escape_text(&c.notes)
                )
            })
            .collect();
        format!("<div class=\"row\">{cards}</div>")
    }
}

impl RenderSection for MiscSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let items: String = self
            .items
            .iter()
            .map(|it| format!("<li>{}</li>", escape_text(it)))
            .collect();
        format!("<div class=\"card\"><ul>{items}</ul></div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_travel_cards() {
        let section: CardsSection = serde_json::from_value(json!({
            "places": [ { "name": "Oslo", "year": 2021, "notes": "Cold \"but\" nice" } ]
        }))
        .unwrap();
        let html = section.render_body(&mut RenderContext::default());
        assert_eq!(
            html,
            "<div class=\"row\"><div class=\"card col\"><strong>Oslo</strong><div class=\"muted\">2021</div><div>Cold &quot;but&quot; nice</div></div></div>"
        );
    }

    #[test]
    fn test_misc_list() {
        let section: MiscSection =
            serde_json::from_value(json!({ "items": ["Chess", "<Go>"] })).unwrap();
        let html = section.render_body(&mut RenderContext::default());
        assert_eq!(
            html,
            "<div class=\"card\"><ul><li>Chess</li><li>&lt;Go&gt;</li></ul></div>"
        );
    }
}
