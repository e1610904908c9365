use anyhow::Result;
use clap::ArgMatches;
use clap::parser::ValueSource;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Everything a command needs, merged from CLI args, env vars, the config
/// file and defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    pub build: BuildConfig,
    /// Render settings shared with folio-core
    #[serde(flatten)]
    pub site: folio_core::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Content document path or URL
    pub content: String,
    /// Output directory for the generated site
    pub output: String,
    /// Theme directory holding an optional page.html
    pub theme: String,
    /// Configuration file path
    pub config: String,
    /// Host for the dev server
    pub host: String,
    /// Port for the dev server
    pub port: u16,
    /// Open browser automatically
    pub open: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "./site/content.json".to_string(),
            output: "./out".to_string(),
            theme: "./theme".to_string(),
            config: "./folio.toml".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            open: false,
        }
    }
}

impl FolioConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments given explicitly (highest priority)
    /// 2. Environment variables (FOLIO_*, `__` between nested keys)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = arg(args, "config")
            .cloned()
            .unwrap_or_else(|| BuildConfig::default().config);

        let mut builder = ConfigBuilder::builder();

        builder = builder.add_source(ConfigBuilder::try_from(&Self::default())?);

        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut cli_overrides = HashMap::new();
        for key in ["content", "output", "theme", "config", "host"] {
            if let Some(value) = explicit(args, key) {
                cli_overrides.insert(format!("build.{key}"), value.clone());
            }
        }
        if let Some(port) = explicit(args, "port") {
            if let Ok(port_num) = port.parse::<u16>() {
                cli_overrides.insert("build.port".to_string(), port_num.to_string());
            }
        }
        if args.try_get_one::<bool>("open").ok().flatten() == Some(&true) {
            cli_overrides.insert("build.open".to_string(), "true".to_string());
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(ConfigBuilder::try_from(&cli_overrides)?);
        }

        let config = builder.build()?;
        let folio_config: FolioConfig = config.try_deserialize()?;

        tracing::debug!(?folio_config, "loaded configuration");
        Ok(folio_config)
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// String argument value, tolerating ids the command does not define.
fn arg<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a String> {
    args.try_get_one::<String>(id).ok().flatten()
}

/// Argument value only when typed on the command line, so a clap default
/// never hides the config file or the environment.
fn explicit<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a String> {
    let value = arg(args, id)?;
    match args.value_source(id) {
        Some(ValueSource::CommandLine) => Some(value),
        _ => None,
    }
}
