use crate::assembler::brand_html;
use crate::host::{HostPage, PageMeta, PageState};

pub const FALLBACK_NOTICE: &str = "<div class=\"card fallback\" role=\"alert\">\
<h2>Content unavailable</h2>\
<p>The site content could not be loaded. Check that <code>content.json</code> \
is present next to the site and contains valid JSON.</p></div>";

/// The page shown when the content document cannot be loaded.
///
/// Logs `error` and never fails.
pub fn render_fallback(error: &dyn std::error::Error) -> HostPage {
    tracing::error!(error = %error, "content document unavailable, rendering fallback");

    HostPage {
        meta: PageMeta {
            title: "Profile".to_string(),
            description: String::new(),
            image: "assets/profile.svg".to_string(),
        },
        brand: brand_html("assets/logo.svg", "Your Name", "Edit content.json"),
        nav: String::new(),
        content: FALLBACK_NOTICE.to_string(),
        footer: String::new(),
        page_id: None,
        sections: Vec::new(),
        state: PageState::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_page() {
        let err = std::io::Error::other("connection refused");
        let page = render_fallback(&err);
        assert!(page.is_fallback());
        assert_eq!(page.content, FALLBACK_NOTICE);
        assert_eq!(page.meta.title, "Profile");
        assert!(page.brand.contains("Your Name"));
        assert!(page.sections.is_empty());
        assert!(page.footer.is_empty());
    }
}
