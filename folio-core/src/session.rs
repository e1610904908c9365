//! The live page after render: search, collapsibles, nav toggle, print and
//! reveal state, independent of any particular host document.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::assembler::PageAssembler;
use crate::collapsible::{Collapsible, PanelMetrics, StyleStep};
use crate::content::{ContentDocument, ProjectsSection};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::host::HostPage;
use crate::renderer::RenderContext;
use crate::reveal::Revealer;
use crate::sections::Section;
use crate::sections::projects::render_filtered;

/// Root class applied while printing only the print-only subset.
pub const PRINT_ONLY_CLASS: &str = "print-only";

const GRID_PANEL_PREFIX: &str = "toggle-project-";

pub struct PageSession {
    page: HostPage,
    ctx: RenderContext,
    projects: Option<ProjectsSection>,
    grid: Option<String>,
    grid_panels: Vec<String>,
    query: String,
    panels: HashMap<String, Collapsible>,
    nav_open: bool,
    revealer: Revealer,
    search: Debouncer<String>,
    search_rx: mpsc::UnboundedReceiver<String>,
}

impl PageSession {
    /// Render `page_id` of `doc` and wire up its interactions.
    ///
    /// Must be created inside a tokio runtime.
    pub fn start(
        assembler: &PageAssembler,
        doc: &ContentDocument,
        page_id: Option<&str>,
        observer_available: bool,
    ) -> Self {
        Self::start_with_delay(assembler, doc, page_id, observer_available, SEARCH_DEBOUNCE)
    }

    pub fn start_with_delay(
        assembler: &PageAssembler,
        doc: &ContentDocument,
        page_id: Option<&str>,
        observer_available: bool,
        debounce: Duration,
    ) -> Self {
        let mut ctx = assembler.context_for(doc);
        let page = assembler.render_with(doc, page_id, &mut ctx);

        let issued = ctx.take_issued_panels();
        let grid_panels: Vec<String> = issued
            .iter()
            .filter(|id| id.starts_with(GRID_PANEL_PREFIX))
            .cloned()
            .collect();
        let panels = issued
            .into_iter()
            .map(|id| (id.clone(), Collapsible::new(id)))
            .collect();

        let projects = page.sections.iter().find_map(|key| {
            match Section::resolve(key, doc.sections.get(key)?) {
                Section::Projects(section) => Some(section),
                _ => None,
            }
        });

        let revealer = Revealer::new(ctx.reveal, observer_available, page.sections.clone());
        let (search, search_rx) = Debouncer::new(debounce);

        Self {
            page,
            ctx,
            projects,
            grid: None,
            grid_panels,
            query: String::new(),
            panels,
            nav_open: false,
            revealer,
            search,
            search_rx,
        }
    }

    pub fn page(&self) -> &HostPage {
        &self.page
    }

    /// Grid markup after the latest filter pass, `None` until the first one.
    pub fn projects_grid(&self) -> Option<&str> {
        self.grid.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// A keystroke in the search box. The filter runs once input settles.
    pub fn input_search(&mut self, value: impl Into<String>) {
        if self.projects.is_some() {
            self.search.call(value.into());
        }
    }

    /// Wait for pending search input and run its filter pass.
    ///
    /// Returns false when nothing was pending.
    pub async fn settle(&mut self) -> bool {
        let query = match self.search_rx.try_recv() {
            Ok(query) => query,
            Err(_) if self.search.is_pending() => match self.search_rx.recv().await {
                Some(query) => query,
                None => return false,
            },
            Err(_) => return false,
        };
        self.apply_search(&query);
        true
    }

    /// Filter the projects grid right away, bypassing the debounce.
    pub fn apply_search(&mut self, query: &str) {
        let Some(projects) = &self.projects else {
            return;
        };

        let grid = render_filtered(projects, query, &mut self.ctx);
        for id in self.grid_panels.drain(..) {
            self.panels.remove(&id);
        }
        for id in self.ctx.take_issued_panels() {
            self.grid_panels.push(id.clone());
            self.panels.insert(id.clone(), Collapsible::new(id));
        }

        self.query = query.trim().to_string();
        self.grid = Some(grid);
    }

    pub fn panel(&self, panel_id: &str) -> Option<&Collapsible> {
        self.panels.get(panel_id)
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    pub fn toggle(&mut self, panel_id: &str, metrics: &impl PanelMetrics) -> Option<Vec<StyleStep>> {
        Some(self.panels.get_mut(panel_id)?.toggle(metrics))
    }

    pub fn transition_end(&mut self, panel_id: &str) -> Option<StyleStep> {
        self.panels.get_mut(panel_id)?.transition_end()
    }

    /// Flip the mobile navigation; returns the new open state.
    pub fn toggle_nav(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }

    /// Following a nav link always closes the mobile navigation.
    pub fn nav_link_clicked(&mut self) {
        self.nav_open = false;
    }

    pub fn nav_open(&self) -> bool {
        self.nav_open
    }

    /// Root classes in effect while the print dialog is up.
    ///
    /// They apply for the duration of printing only and are gone afterwards.
    pub fn print(&self, print_only: bool) -> Vec<&'static str> {
        if print_only {
            vec![PRINT_ONLY_CLASS]
        } else {
            Vec::new()
        }
    }

    /// A section entered the viewport. Returns true the first time only.
    pub fn intersect(&mut self, section_id: &str) -> bool {
        self.revealer.intersect(section_id)
    }

    pub fn revealer(&self) -> &Revealer {
        &self.revealer
    }
}
