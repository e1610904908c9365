use serde::Serialize;

/// A rendered page, split into the slots the surrounding page shell provides.
///
/// Every string field except the metadata is finished, escaped markup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostPage {
    pub meta: PageMeta,
    pub brand: String,
    pub nav: String,
    pub content: String,
    pub footer: String,
    /// Section key this page shows in multi-page layouts.
    pub page_id: Option<String>,
    /// Keys of the sections rendered into `content`, in order.
    pub sections: Vec<String>,
    pub state: PageState,
}

impl HostPage {
    pub fn is_fallback(&self) -> bool {
        self.state == PageState::Fallback
    }
}

/// Plain-text metadata for the document head and social previews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageState {
    #[default]
    Rendered,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: String,
    pub text: String,
    pub link: String,
}
