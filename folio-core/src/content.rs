//! The content document: the single JSON file a site is rendered from.
//!
//! Free-text fields are read leniently. Strings are taken as is, numbers and
//! booleans become their text form, anything else (including a missing
//! field) becomes the empty string. Lists skip entries that do not fit the
//! expected record shape instead of failing the whole section.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentDocument {
    pub site: SiteMeta,
    /// Section key to raw section data, in document order.
    pub sections: Map<String, Value>,
    /// Navigation list of the multi-page schema variant.
    #[serde(deserialize_with = "nav_entries")]
    pub nav: Option<Vec<NavEntry>>,
}

impl ContentDocument {
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Keys in navigation order, before filtering out absent sections.
    ///
    /// `site.navOrder` wins, then the root `nav` list, then document order.
    pub fn nav_order(&self) -> Vec<&str> {
        if let Some(order) = &self.site.nav_order {
            return order.iter().map(String::as_str).collect();
        }
        if let Some(nav) = &self.nav {
            return nav.iter().map(NavEntry::key).collect();
        }
        self.sections.keys().map(String::as_str).collect()
    }

    /// Navigation order restricted to keys that exist in `sections`.
    pub fn resolved_keys(&self) -> Vec<&str> {
        self.nav_order()
            .into_iter()
            .filter(|key| self.sections.contains_key(*key))
            .collect()
    }

    pub fn nav_entry(&self, key: &str) -> Option<&NavEntry> {
        self.nav.as_ref()?.iter().find(|e| e.key() == key)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteMeta {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub subtitle: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "opt_text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub logo: Option<String>,
    #[serde(deserialize_with = "text")]
    pub tagline: String,
    #[serde(deserialize_with = "text")]
    pub copyright: String,
    #[serde(alias = "nav_order", deserialize_with = "opt_text_list")]
    pub nav_order: Option<Vec<String>>,
    pub layout: Option<Layout>,
}

/// How sections are distributed over pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Every section on one page, nav links are fragment anchors.
    #[default]
    SinglePage,
    /// One page per section, nav links are page paths.
    MultiPage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NavEntry {
    Key(String),
    Entry {
        key: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        href: Option<String>,
    },
}

impl NavEntry {
    pub fn key(&self) -> &str {
        match self {
            NavEntry::Key(key) => key,
            NavEntry::Entry { key, .. } => key,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            NavEntry::Key(_) => None,
            NavEntry::Entry { title, .. } => title.as_deref(),
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            NavEntry::Key(_) => None,
            NavEntry::Entry { href, .. } => href.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SectionMeta {
    #[serde(deserialize_with = "text")]
    pub title: String,
    /// Overrides the kind otherwise derived from the section key.
    #[serde(deserialize_with = "opt_text")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "text")]
    pub intro: String,
    #[serde(deserialize_with = "opt_text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EducationSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "items")]
    pub items: Vec<EducationItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "text")]
    pub degree: String,
    #[serde(deserialize_with = "text")]
    pub institution: String,
    #[serde(deserialize_with = "text")]
    pub period: String,
    #[serde(deserialize_with = "text")]
    pub details: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResearchSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "items")]
    pub items: Vec<ResearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResearchItem {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub role: String,
    #[serde(deserialize_with = "text")]
    pub period: String,
    #[serde(deserialize_with = "text")]
    pub summary: String,
    #[serde(deserialize_with = "opt_text")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectsSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "items")]
    pub items: Vec<ProjectItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectItem {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub subtitle: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "opt_text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub image_alt: Option<String>,
    #[serde(deserialize_with = "text_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TestScoresSection {
    pub meta: SectionMeta,
    #[serde(alias = "items", deserialize_with = "items")]
    pub list: Vec<TestScore>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TestScore {
    #[serde(deserialize_with = "text")]
    pub test: String,
    #[serde(deserialize_with = "text")]
    pub score: String,
    #[serde(deserialize_with = "opt_text")]
    pub year: Option<String>,
}

/// Hobbies and travelling: a flat run of cards.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CardsSection {
    pub meta: SectionMeta,
    #[serde(alias = "places", deserialize_with = "items")]
    pub items: Vec<CardItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CardItem {
    #[serde(alias = "title", deserialize_with = "text")]
    pub name: String,
    #[serde(alias = "period", deserialize_with = "text")]
    pub year: String,
    #[serde(alias = "details", alias = "description", deserialize_with = "text")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MiscSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "text_list")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactSection {
    pub meta: SectionMeta,
    #[serde(deserialize_with = "opt_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "items")]
    pub socials: Vec<SocialLink>,
    pub form: Option<ContactForm>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SocialLink {
    #[serde(deserialize_with = "text")]
    pub label: String,
    #[serde(deserialize_with = "text")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactForm {
    pub enabled: bool,
    #[serde(deserialize_with = "opt_text")]
    pub action: Option<String>,
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_text(Value::deserialize(d)?))
}

fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = value_text(Value::deserialize(d)?);
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => values
            .into_iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn opt_text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => Some(values.into_iter().map(value_text).collect()),
        _ => None,
    })
}

fn nav_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<NavEntry>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => Some(
            values
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
        ),
        _ => None,
    })
}

fn items<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Array(values) => Ok(values
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed item");
                    None
                }
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a list of items, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "site": { "title": "Ada", "navOrder": ["home", "ghost", "projects"] },
        "sections": {
            "projects": { "meta": { "title": "Projects" }, "items": [] },
            "home": { "meta": { "title": "Home" }, "intro": "Hi" },
            "contact": { "meta": { "title": "Contact" } }
        }
    }"#;

    #[test]
    fn test_nav_order_prefers_site_nav_order() {
        let doc = ContentDocument::from_json(DOC).unwrap();
        assert_eq!(doc.nav_order(), vec!["home", "ghost", "projects"]);
        assert_eq!(doc.resolved_keys(), vec!["home", "projects"]);
    }

    #[test]
    fn test_nav_order_falls_back_to_document_order() {
        let doc = ContentDocument::from_json(
            r#"{ "sections": { "b": {}, "a": {}, "c": {} } }"#,
        )
        .unwrap();
        assert_eq!(doc.resolved_keys(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_multi_page_nav_list() {
        let doc = ContentDocument::from_json(
            r#"{
                "site": { "layout": "multi-page" },
                "nav": ["home", { "key": "research", "title": "Papers" }, 42],
                "sections": { "home": {}, "research": {} }
            }"#,
        )
        .unwrap();
        assert_eq!(doc.site.layout, Some(Layout::MultiPage));
        assert_eq!(doc.resolved_keys(), vec!["home", "research"]);
        assert_eq!(doc.nav_entry("research").and_then(NavEntry::title), Some("Papers"));
    }

    #[test]
    fn test_lenient_fields() {
        let score: TestScore =
            serde_json::from_value(serde_json::json!({ "test": "GRE", "score": 330, "year": null }))
                .unwrap();
        assert_eq!(score.score, "330");
        assert_eq!(score.year, None);

        let item: ProjectItem =
            serde_json::from_value(serde_json::json!({ "title": "X", "tags": "solo" })).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.tags, vec!["solo"]);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let section: EducationSection = serde_json::from_value(serde_json::json!({
            "items": [ { "degree": "BSc" }, "oops", { "degree": "MSc" } ]
        }))
        .unwrap();
        assert_eq!(section.items.len(), 2);
        assert_eq!(section.items[1].degree, "MSc");
    }

    #[test]
    fn test_card_aliases() {
        let section: CardsSection = serde_json::from_value(serde_json::json!({
            "places": [ { "name": "Kyoto", "year": 2019, "notes": "Temples" } ]
        }))
        .unwrap();
        assert_eq!(section.items[0].year, "2019");
        assert_eq!(section.items[0].notes, "Temples");
    }
}
