use crate::content::Layout;
use crate::reveal::RevealStyle;

/// Everything a section renderer may depend on besides its own data.
///
/// Built once per page and threaded through every renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub layout: Layout,
    pub reveal: RevealStyle,
    /// Fragment endpoint the projects search box queries, when served live.
    pub search_endpoint: Option<String>,
    next_panel: usize,
    next_section: usize,
    issued_panels: Vec<String>,
}

impl RenderContext {
    pub fn new(layout: Layout, reveal: RevealStyle) -> Self {
        Self {
            layout,
            reveal,
            ..Self::default()
        }
    }

    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    /// Unique id for a collapsible panel, e.g. `toggle-research-0-1`.
    pub fn panel_id(&mut self, scope: &str, index: usize) -> String {
        self.next_panel += 1;
        let id = format!("toggle-{}-{}-{}", scope, index, self.next_panel);
        self.issued_panels.push(id.clone());
        id
    }

    /// Panel ids handed out since the last call.
    pub fn take_issued_panels(&mut self) -> Vec<String> {
        std::mem::take(&mut self.issued_panels)
    }

    /// Position of the next rendered section, used for reveal delays.
    pub fn next_section_index(&mut self) -> usize {
        let index = self.next_section;
        self.next_section += 1;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_ids_are_unique() {
        let mut ctx = RenderContext::default();
        let a = ctx.panel_id("project", 0);
        let b = ctx.panel_id("project", 0);
        assert_ne!(a, b);
        assert!(a.starts_with("toggle-project-0-"));
        assert_eq!(ctx.take_issued_panels(), vec![a, b]);
        assert!(ctx.take_issued_panels().is_empty());
    }
}
