use crate::content::HomeSection;
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::RenderSection;

impl RenderSection for HomeSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let mut html = format!("<div class=\"card\"><p>{}</p>", escape_text(&self.intro));

        if let Some(image) = &self.image {
            let alt = self
                .image_alt
                .as_deref()
                .or(Some(self.meta.title.as_str()).filter(|t| !t.is_empty()))
                .unwrap_or("profile picture");
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" style=\"max-width:140px;float:right;margin-left:12px\">",
                escape_text(image),
                escape_text(alt)
            ));
        }

        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn home(value: serde_json::Value) -> HomeSection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_intro_without_image() {
        let html = home(json!({ "intro": "I build <things>" })).render_body(&mut RenderContext::default());
        assert_eq!(html, "<div class=\"card\"><p>I build &lt;things&gt;</p></div>");
    }

    #[test]
    fn test_image_alt_fallbacks() {
        let mut ctx = RenderContext::default();
        let with_title = home(json!({ "meta": { "title": "About" }, "image": "me.png" }));
        assert!(with_title.render_body(&mut ctx).contains("alt=\"About\""));

        let bare = home(json!({ "image": "me.png" }));
        assert!(bare.render_body(&mut ctx).contains("alt=\"profile picture\""));

        let explicit = home(json!({ "image": "me.png", "imageAlt": "Me, smiling" }));
        assert!(explicit.render_body(&mut ctx).contains("alt=\"Me, smiling\""));
    }
}
