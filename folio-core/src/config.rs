use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::Layout;
use crate::reveal::RevealStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
}

/// Site settings from `folio.toml`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    /// Set while serving locally, never read from the file.
    #[serde(skip)]
    pub dev: Option<DevConfig>,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }

    /// Switch to local preview mode on `host:port`.
    pub fn dev(&mut self, host: String, port: u16) {
        self.dev = Some(DevConfig { host, port });
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Overrides `site.layout` from the content document.
    pub layout: Option<Layout>,
    pub reveal: RevealStyle,
    /// Ship the cosmetic context-menu and shortcut blocker.
    pub protection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevConfig {
    pub host: String,
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_render_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(
            &path,
            "[render]\nlayout = \"multi-page\"\nreveal = \"staggered\"\nprotection = true\n",
        )
        .unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.render.layout, Some(Layout::MultiPage));
        assert_eq!(config.render.reveal, RevealStyle::Staggered);
        assert!(config.render.protection);
        assert!(config.dev.is_none());
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.layout, None);
        assert_eq!(config.render.reveal, RevealStyle::Simple);
        assert!(!config.render.protection);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[render]\nreveal = \"sideways\"\n").unwrap();
        assert!(matches!(Config::read(&path), Err(ConfigError::Parsing(_))));
        assert!(matches!(
            Config::read(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
