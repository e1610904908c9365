use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::host::HostPage;

/// Name of the page shell template, both built in and in theme directories.
pub const PAGE_TEMPLATE: &str = "page.html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    TeraError(#[from] tera::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Extra markup placed into every page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageExtras {
    /// Client script body, without the `<script>` tag.
    pub script: String,
    /// Raw markup appended before `</body>`, e.g. a live reload hook.
    pub body_end: String,
}

pub struct TemplateRenderer {
    tera: Tera,
    context: Context,
}

impl TemplateRenderer {
    /// Load `page.html` (and anything it includes) from `theme_dir`, or fall
    /// back to the built-in page shell when the directory has no templates.
    pub fn new(theme_dir: &Path) -> Result<Self, TemplateError> {
        let mut tera = if theme_dir.join(PAGE_TEMPLATE).is_file() {
            let glob = theme_dir.join("**").join("*.html");
            tracing::debug!(theme = %theme_dir.display(), "loading theme templates");
            Tera::new(&glob.to_string_lossy())?
        } else {
            Tera::default()
        };

        if !tera.get_template_names().any(|n| n == PAGE_TEMPLATE) {
            tera.add_raw_template(PAGE_TEMPLATE, DEFAULT_PAGE)?;
        }

        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    /// Built-in page shell only.
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, DEFAULT_PAGE)?;
        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    /// Add a value shared by every page
    pub fn add_to_context<T: Serialize>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    /// Render a full HTML document for `page`.
    pub fn render_page(&self, page: &HostPage, extras: &PageExtras) -> Result<String, TemplateError> {
        let mut context = self.context.clone();
        context.insert("page", page);
        context.insert("extras", extras);
        Ok(self.tera.render(PAGE_TEMPLATE, &context)?)
    }

    /// Render `page` and write it to `output_path`, creating parent directories.
    pub fn render_to_file(
        &self,
        page: &HostPage,
        extras: &PageExtras,
        output_path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render_page(page, extras)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(output_path, rendered)?;
        Ok(())
    }
}

/// Last-resort document when even the page shell fails to render.
pub fn minimal_document(page: &HostPage) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><main id=\"content-root\">{}</main></body></html>\n",
        html_escape::encode_text(&page.meta.title),
        page.content
    )
}

const DEFAULT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title id="page-title">{{ page.meta.title }}</title>
  <meta id="meta-description" name="description" content="{{ page.meta.description }}">
  <meta id="og-title" property="og:title" content="{{ page.meta.title }}">
  <meta id="og-desc" property="og:description" content="{{ page.meta.description }}">
  <meta id="og-image" property="og:image" content="{{ page.meta.image }}">
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; color: #1d232a; }
    header { display: flex; align-items: center; justify-content: space-between; padding: 12px 20px; }
    #brand { display: flex; gap: 10px; align-items: center; }
    #brand .logo { width: 40px; height: 40px; background-size: cover; border-radius: 50%; }
    #brand .subtitle, .muted { color: #66707a; font-size: .9em; }
    .nav-list { display: flex; gap: 14px; }
    .nav-list a.active { font-weight: 600; }
    #nav-toggle { display: none; }
    main { max-width: 960px; margin: 0 auto; padding: 0 20px; }
    .card, .project-item { border: 1px solid #e3e6ea; border-radius: 8px; padding: 14px; margin: 10px 0; }
    .row, .projects-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 12px; }
    .collapsible-content { overflow: hidden; transition: max-height .3s ease, opacity .3s ease; }
    .tag { display: inline-block; background: #eef1f4; border-radius: 4px; padding: 0 6px; margin: 2px; }
    mark.match { background: #ffe58a; }
    .content-section { opacity: 0; transform: translateY(12px); transition: opacity .5s ease, transform .5s ease; transition-delay: var(--reveal-delay, 0ms); }
    .content-section.in-view { opacity: 1; transform: none; }
    @media (max-width: 700px) {
      #nav-toggle { display: block; }
      #site-nav { display: none; }
      #site-nav.open { display: block; }
    }
    @media print {
      header button, header label, .controls, .toggle-btn { display: none; }
      .collapsible-content { max-height: none !important; opacity: 1 !important; }
      .content-section { opacity: 1; transform: none; }
      .print-only header, .print-only footer { display: none; }
    }
  </style>
</head>
<body{% if page.page_id %} data-page="{{ page.page_id }}"{% endif %}>
  <header>
    <div id="brand">{{ page.brand | safe }}</div>
    <button id="nav-toggle" type="button" aria-expanded="false" aria-controls="site-nav">Menu</button>
    <nav id="site-nav">{{ page.nav | safe }}</nav>
    <div>
      <label><input type="checkbox" id="print-only"> Content only</label>
      <button id="print-btn" type="button">Print</button>
    </div>
  </header>
  <main id="content-root">{{ page.content | safe }}</main>
  <footer><div id="footer-inner">{{ page.footer | safe }}</div></footer>
  <script>{{ extras.script | safe }}</script>
  {{ extras.body_end | safe }}
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PageMeta;

    fn page() -> HostPage {
        HostPage {
            meta: PageMeta {
                title: "Ada & co".to_string(),
                description: "Say \"hi\"".to_string(),
                image: "assets/profile.svg".to_string(),
            },
            brand: "<div class=\"title\">Ada</div>".to_string(),
            content: "<section id=\"home\"></section>".to_string(),
            ..HostPage::default()
        }
    }

    #[test]
    fn test_builtin_shell_fills_slots() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let html = renderer.render_page(&page(), &PageExtras::default()).unwrap();
        assert!(html.contains("<title id=\"page-title\">Ada &amp; co</title>"));
        assert!(html.contains("content=\"Say &quot;hi&quot;\""));
        assert!(html.contains("<main id=\"content-root\"><section id=\"home\"></section></main>"));
        assert!(html.contains("<div id=\"brand\"><div class=\"title\">Ada</div></div>"));
    }

    #[test]
    fn test_theme_dir_overrides_shell() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PAGE_TEMPLATE),
            "<h1>{{ page.meta.title }}</h1>{{ page.content | safe }}",
        )
        .unwrap();

        let renderer = TemplateRenderer::new(dir.path()).unwrap();
        let html = renderer.render_page(&page(), &PageExtras::default()).unwrap();
        assert_eq!(html, "<h1>Ada &amp; co</h1><section id=\"home\"></section>");
    }

    #[test]
    fn test_render_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects").join("index.html");
        let renderer = TemplateRenderer::builtin().unwrap();

        renderer
            .render_to_file(&page(), &PageExtras::default(), &path)
            .unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<section id=\"home\"></section>"));
    }

    #[test]
    fn test_broken_theme_fails_to_render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PAGE_TEMPLATE), "{{ page.meta.title | no_such_filter }}").unwrap();
        let err = TemplateRenderer::new(dir.path())
            .and_then(|r| r.render_page(&page(), &PageExtras::default()));
        assert!(matches!(err, Err(TemplateError::TeraError(_))));
    }

    #[test]
    fn test_missing_theme_dir_uses_builtin() {
        let renderer = TemplateRenderer::new(Path::new("/definitely/not/here")).unwrap();
        let html = renderer.render_page(&page(), &PageExtras::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
