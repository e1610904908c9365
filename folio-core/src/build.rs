use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assembler::{LoadOutcome, PageAssembler, is_plain_segment};
use crate::assets::copy_assets;
use crate::client::{ClientOptions, client_script};
use crate::config::Config;
use crate::content::{ContentDocument, Layout};
use crate::fallback::render_fallback;
use crate::host::HostPage;
use crate::source::{ContentSource, source_for};
use crate::template::{PageExtras, TemplateError, TemplateRenderer, minimal_document};

/// Route the serve command answers project searches on.
pub const SEARCH_ENDPOINT: &str = "/__folio/projects";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No content source given")]
    MissingSource,
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a build wrote.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub assets: usize,
    /// The content could not be loaded and the fallback page was written.
    pub fallback: bool,
}

pub struct SiteBuilder {
    source: Option<Box<dyn ContentSource>>,
    output_dir: PathBuf,
    theme_dir: PathBuf,
    assets_dir: Option<PathBuf>,
    config: Config,
    body_end: String,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            output_dir: PathBuf::from("./out"),
            theme_dir: PathBuf::from("./theme"),
            assets_dir: None,
            config: Config::default(),
            body_end: String::new(),
        }
    }

    /// Content path or URL. A local path also picks up the `assets`
    /// directory next to it.
    pub fn content(mut self, location: &str) -> Self {
        if !location.contains("://") {
            let parent = Path::new(location).parent().unwrap_or(Path::new(""));
            self.assets_dir = Some(parent.join("assets"));
        }
        self.source = Some(source_for(location));
        self
    }

    pub fn source(mut self, source: Box<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn assets_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.assets_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Raw markup appended to every page, e.g. a live reload hook.
    pub fn body_end(mut self, html: impl Into<String>) -> Self {
        self.body_end = html.into();
        self
    }

    pub fn build(self) -> Result<Site, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let renderer = TemplateRenderer::new(&self.theme_dir)?;

        let mut assembler = PageAssembler::new().reveal(self.config.render.reveal);
        if let Some(layout) = self.config.render.layout {
            assembler = assembler.layout(layout);
        }
        if self.config.dev.is_some() {
            assembler = assembler.search_endpoint(SEARCH_ENDPOINT);
        }

        let extras = PageExtras {
            script: client_script(ClientOptions {
                protection: self.config.render.protection,
            }),
            body_end: self.body_end,
        };

        Ok(Site {
            source,
            renderer,
            assembler,
            extras,
            output_dir: self.output_dir,
            assets_dir: self.assets_dir,
        })
    }
}

pub struct Site {
    source: Box<dyn ContentSource>,
    renderer: TemplateRenderer,
    assembler: PageAssembler,
    extras: PageExtras,
    output_dir: PathBuf,
    assets_dir: Option<PathBuf>,
}

impl Site {
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load the content once and write every page.
    ///
    /// A content load failure is not an error: the fallback page is written
    /// as `index.html` and the report says so.
    pub async fn render_all(&mut self) -> Result<BuildReport, BuildError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut report = BuildReport::default();
        match self.assembler.load(&*self.source).await {
            LoadOutcome::Ready(doc) => {
                self.renderer.add_to_context("site", &doc.site);
                for (page_id, out_path) in page_plan(&doc, self.assembler.layout_for(&doc)) {
                    let page = self.assembler.render(&doc, page_id.as_deref());
                    report.pages.push(self.write_page(&page, &out_path)?);
                }
            }
            LoadOutcome::Failed(page) => {
                report.fallback = true;
                report.pages.push(self.write_page(&page, Path::new("index.html"))?);
            }
        }

        if let Some(assets) = &self.assets_dir {
            report.assets = copy_assets(assets, self.output_dir.join("assets"))?;
        }

        tracing::info!(
            pages = report.pages.len(),
            assets = report.assets,
            fallback = report.fallback,
            "site written"
        );
        Ok(report)
    }

    /// Render through the page shell, degrading to a bare document when the
    /// shell itself fails.
    fn write_page(&self, page: &HostPage, relative: &Path) -> Result<PathBuf, BuildError> {
        let output_path = self.output_dir.join(relative);
        match self.renderer.render_to_file(page, &self.extras, &output_path) {
            Ok(()) => {}
            Err(TemplateError::TeraError(e)) => {
                tracing::error!(page = %relative.display(), error = %e, "page shell failed to render");
                if let Some(parent) = output_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&output_path, minimal_document(&render_fallback(&e)))?;
            }
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(path = %output_path.display(), "wrote page");
        Ok(output_path)
    }
}

/// Pages to write, as `(page_id, path relative to the output dir)`.
///
/// Multi-page layouts put the first navigation key at the root and every
/// other key in its own directory. Keys that are not a single plain path
/// component are skipped.
pub fn page_plan(doc: &ContentDocument, layout: Layout) -> Vec<(Option<String>, PathBuf)> {
    match layout {
        Layout::SinglePage => vec![(None, PathBuf::from("index.html"))],
        Layout::MultiPage => doc
            .resolved_keys()
            .into_iter()
            .enumerate()
            .filter_map(|(idx, key)| {
                if idx == 0 {
                    return Some((Some(key.to_string()), PathBuf::from("index.html")));
                }
                if !is_plain_segment(key) {
                    tracing::warn!(section = key, "section key is not usable as a page path");
                    return None;
                }
                Some((Some(key.to_string()), Path::new(key).join("index.html")))
            })
            .collect(),
    }
}

/// Build a site the way the CLI does.
pub async fn build_site(
    config: &Config,
    content: &str,
    output_dir: &Path,
    theme_dir: &Path,
    body_end: &str,
) -> Result<BuildReport, BuildError> {
    SiteBuilder::new()
        .content(content)
        .output_dir(output_dir)
        .theme_dir(theme_dir)
        .config(config.clone())
        .body_end(body_end)
        .build()?
        .render_all()
        .await
}
