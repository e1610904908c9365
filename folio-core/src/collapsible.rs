//! Toggle-controlled panels with an animated height transition.
//!
//! A [`Collapsible`] owns the `expanded` flag of one toggle control and the
//! style of the panel it controls. Every transition is reported as the list
//! of [`StyleStep`]s applied, in order, so a host can replay them on a real
//! element. The browser side of the same machine lives in the client script.

use crate::escape::escape_text;

/// Extra room added to the measured height while the panel opens.
pub const OPEN_PADDING_PX: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Px(u32),
    /// No height constraint, content reflows freely.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelStyle {
    pub max_height: Extent,
    pub opaque: bool,
    pub open: bool,
}

impl PanelStyle {
    pub fn collapsed() -> Self {
        Self {
            max_height: Extent::Px(0),
            opaque: false,
            open: false,
        }
    }

    pub fn to_css(&self) -> String {
        let height = match self.max_height {
            Extent::Px(0) => "0".to_string(),
            Extent::Px(px) => format!("{px}px"),
            Extent::None => "none".to_string(),
        };
        format!(
            "max-height:{};opacity:{}",
            height,
            if self.opaque { 1 } else { 0 }
        )
    }

    fn apply(&mut self, step: StyleStep) {
        match step {
            StyleStep::SetMaxHeight(extent) => self.max_height = extent,
            StyleStep::SetOpacity(opaque) => self.opaque = opaque,
            StyleStep::AddOpenClass => self.open = true,
            StyleStep::RemoveOpenClass => self.open = false,
            StyleStep::ForceLayout => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleStep {
    SetMaxHeight(Extent),
    SetOpacity(bool),
    AddOpenClass,
    RemoveOpenClass,
    /// Read back layout so the frozen height is committed before animating.
    ForceLayout,
}

/// Heights measured from the rendered panel at transition time.
pub trait PanelMetrics {
    /// Natural height of the panel content.
    fn scroll_height(&self) -> u32;
    /// Height the panel currently occupies on screen.
    fn rendered_height(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics {
    pub scroll: u32,
    pub rendered: u32,
}

impl PanelMetrics for FixedMetrics {
    fn scroll_height(&self) -> u32 {
        self.scroll
    }

    fn rendered_height(&self) -> u32 {
        self.rendered
    }
}

#[derive(Debug, Clone)]
pub struct Collapsible {
    panel_id: String,
    expanded: bool,
    style: PanelStyle,
    relax_pending: bool,
}

impl Collapsible {
    pub fn new(panel_id: impl Into<String>) -> Self {
        Self {
            panel_id: panel_id.into(),
            expanded: false,
            style: PanelStyle::collapsed(),
            relax_pending: false,
        }
    }

    pub fn panel_id(&self) -> &str {
        &self.panel_id
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn style(&self) -> PanelStyle {
        self.style
    }

    /// Flip the control's own `expanded` flag and animate the panel to match.
    pub fn toggle(&mut self, metrics: &impl PanelMetrics) -> Vec<StyleStep> {
        let was_expanded = self.expanded;
        self.expanded = !was_expanded;

        let steps = if was_expanded {
            self.relax_pending = false;
            vec![
                StyleStep::SetMaxHeight(Extent::Px(metrics.rendered_height())),
                StyleStep::ForceLayout,
                StyleStep::SetMaxHeight(Extent::Px(0)),
                StyleStep::SetOpacity(false),
                StyleStep::RemoveOpenClass,
            ]
        } else {
            self.relax_pending = true;
            vec![
                StyleStep::AddOpenClass,
                StyleStep::SetMaxHeight(Extent::Px(metrics.scroll_height() + OPEN_PADDING_PX)),
                StyleStep::SetOpacity(true),
            ]
        };

        for step in &steps {
            self.style.apply(*step);
        }
        steps
    }

    /// The panel finished animating. After opening, the fixed height is dropped.
    pub fn transition_end(&mut self) -> Option<StyleStep> {
        if !self.relax_pending {
            return None;
        }
        self.relax_pending = false;
        let step = StyleStep::SetMaxHeight(Extent::None);
        self.style.apply(step);
        Some(step)
    }
}

/// Toggle button markup controlling `panel_id`.
pub fn render_toggle(label: &str, panel_id: &str) -> String {
    let id = escape_text(panel_id);
    format!(
        "<button class=\"toggle-btn\" type=\"button\" aria-expanded=\"false\" aria-controls=\"{id}\" data-target-id=\"{id}\">{}</button>",
        escape_text(label)
    )
}

/// Collapsed panel wrapping already-escaped `inner` markup.
pub fn render_panel(panel_id: &str, inner: &str) -> String {
    format!(
        "<div class=\"collapsible-content\" id=\"{}\" style=\"{}\">{}</div>",
        escape_text(panel_id),
        PanelStyle::collapsed().to_css(),
        inner
    )
}
