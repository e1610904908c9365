pub mod assembler;
pub mod assets;
pub mod build;
pub mod client;
pub mod collapsible;
pub mod config;
pub mod content;
pub mod debounce;
pub mod escape;
pub mod fallback;
pub mod highlight;
pub mod host;
pub mod protection;
pub mod renderer;
pub mod reveal;
pub mod sections;
pub mod session;
pub mod source;
pub mod template;

// Re-export main types
pub use assembler::{LoadOutcome, PageAssembler};
pub use build::{BuildError, BuildReport, SEARCH_ENDPOINT, Site, SiteBuilder, build_site};
pub use config::{Config, ConfigError};
pub use content::{ContentDocument, Layout};
pub use escape::escape_text;
pub use highlight::highlight_matches;
pub use host::HostPage;
pub use renderer::RenderContext;
pub use reveal::RevealStyle;
pub use session::PageSession;
pub use source::{ContentSource, SourceError, source_for};
pub use template::{TemplateError, TemplateRenderer};
