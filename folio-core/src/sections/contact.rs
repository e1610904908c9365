use crate::content::ContactSection;
use crate::escape::escape_text;
use crate::renderer::RenderContext;

use super::RenderSection;

impl RenderSection for ContactSection {
    fn render_body(&self, _ctx: &mut RenderContext) -> String {
        let mut html = String::from("<div class=\"card\">");

        if let Some(email) = &self.email {
            let email = escape_text(email);
            html.push_str(&format!(
                "<div>Email: <a href=\"mailto:{email}\">{email}</a></div>"
            ));
        }

        if let Some(phone) = &self.phone {
            let phone = escape_text(phone);
            html.push_str(&format!("<div>Phone: <a href=\"tel:{phone}\">{phone}</a></div>"));
        }

        if !self.socials.is_empty() {
            let links = self
                .socials
                .iter()
                .map(|s| {
                    format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                        escape_text(&s.url),
                        escape_text(&s.label)
                    )
                })
                .collect::<Vec<_>>()
                .join(" · ");
            html.push_str(&format!("<div class=\"contact-links\">Social: {links}</div>"));
        }

        // The form is plain markup; submission is the browser's standard POST
        if let Some(form) = self.form.as_ref().filter(|f| f.enabled) {
            html.push_str(&format!(
                "<form method=\"POST\" action=\"{}\" class=\"contact-form\">\
                 <label>Name <input name=\"name\" required></label>\
                 <label>Email <input type=\"email\" name=\"email\" required></label>\
                 <label>Message <textarea name=\"message\" rows=\"4\" required></textarea></label>\
                 <button type=\"submit\" class=\"btn-primary\">Send</button></form>",
                escape_text(form.action.as_deref().unwrap_or("#"))
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

    fn contact(value: serde_json::Value) -> String {
        let section: ContactSection = serde_json::from_value(value).unwrap();
        section.render_body(&mut RenderContext::default())
    }

    #[test]
    fn test_mail_phone_and_socials() {
        let html = contact(json!({
            "email": "ada@example.com",
            "phone": "+1 555",
            "socials": [
                { "label": "GitHub", "url": "https://github.com/ada" },
                { "label": "Blog", "url": "https://ada.dev" }
            ]
        }));
        assert!(html.contains("<a href=\"mailto:ada@example.com\">ada@example.com</a>"));
        assert!(html.contains("href=\"tel:+1 555\""));
        assert!(html.contains("GitHub</a> · <a"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_form_only_when_enabled() {
        let disabled = contact(json!({ "form": { "enabled": false, "action": "/x" } }));
        assert!(!disabled.contains("<form"));

        let enabled = contact(json!({ "form": { "enabled": true, "action": "https://forms.example/abc" } }));
        assert!(enabled.contains("action=\"https://forms.example/abc\""));
        assert!(enabled.contains("method=\"POST\""));

        let default_action = contact(json!({ "form": { "enabled": true } }));
        assert!(default_action.contains("action=\"#\""));
    }
}
