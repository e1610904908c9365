//! Where the content document comes from.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use thiserror::Error;

use crate::content::ContentDocument;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("content document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and parse the content document.
    async fn load(&self) -> Result<ContentDocument, SourceError>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads the document from the filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for FileSource {
    async fn load(&self) -> Result<ContentDocument, SourceError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(ContentDocument::from_json(&data)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the document over HTTP with a cache-busting `v` parameter.
///
/// No timeout and no retry: the request waits until the server answers or the
/// connection fails.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The URL actually requested for a given cache-busting stamp.
    pub fn busted_url(&self, stamp: u128) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}v={}", self.url, sep, stamp)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn load(&self) -> Result<ContentDocument, SourceError> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let url = self.busted_url(stamp);
        tracing::debug!(%url, "fetching content document");

        let http_err = |source| SourceError::Http {
            url: self.url.clone(),
            source,
        };
        let response = self.client.get(&url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        Ok(ContentDocument::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// An already parsed document or a canned failure, used for previews and tests.
pub struct StaticSource {
    result: Result<ContentDocument, String>,
}

impl StaticSource {
    pub fn document(doc: ContentDocument) -> Self {
        Self { result: Ok(doc) }
    }

    /// A source whose every load fails with `reason` as an I/O error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn load(&self) -> Result<ContentDocument, SourceError> {
        match &self.result {
            Ok(doc) => Ok(doc.clone()),
            Err(reason) => Err(SourceError::Io {
                path: PathBuf::from("<static>"),
                source: std::io::Error::other(reason.clone()),
            }),
        }
    }

    fn describe(&self) -> String {
        "<static>".to_string()
    }
}

/// Pick a source for a path or `http(s)://` URL.
pub fn source_for(location: &str) -> Box<dyn ContentSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, r#"{ "site": { "title": "Ada" }, "sections": {} }"#).unwrap();

        let doc = FileSource::new(&path).load().await.unwrap();
        assert_eq!(doc.site.title, "Ada");
    }

    #[tokio::test]
    async fn test_file_source_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileSource::new(dir.path().join("nope.json")).load().await;
        assert!(matches!(missing, Err(SourceError::Io { .. })));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let invalid = FileSource::new(&path).load().await;
        assert!(matches!(invalid, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_cache_busting_parameter() {
        assert_eq!(
            HttpSource::new("https://x.dev/content.json").busted_url(42),
            "https://x.dev/content.json?v=42"
        );
        assert_eq!(
            HttpSource::new("https://x.dev/c.json?lang=en").busted_url(42),
            "https://x.dev/c.json?lang=en&v=42"
        );
    }

    #[test]
    fn test_source_for_picks_by_scheme() {
        assert_eq!(source_for("https://x.dev/c.json").describe(), "https://x.dev/c.json");
        assert_eq!(source_for("./site/content.json").describe(), "./site/content.json");
    }
}
