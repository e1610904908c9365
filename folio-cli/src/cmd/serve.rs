use crate::cmd::build::add_build_args;
use crate::config::FolioConfig;
use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Arg, ArgMatches, Command};
use folio_core::sections::search_document;
use folio_core::{RenderContext, RevealStyle, SEARCH_ENDPOINT, build_site, source_for};
use folio_dev_server::{LiveServer, LiveServerConfig, livereload_script};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("serve"))
        .about("Start development server with live reload")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to serve on")
                .default_value("3000"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Host to bind to")
                .default_value("127.0.0.1"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open browser automatically")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let mut config = FolioConfig::load(args)?;
    let build_config = config.build_config().clone();

    let output_dir = PathBuf::from(&build_config.output);
    let theme_dir = PathBuf::from(&build_config.theme);

    config.site.dev(build_config.host.clone(), build_config.port);
    let body_end = livereload_script(&build_config.host, build_config.port);

    let report = build_site(
        &config.site,
        &build_config.content,
        &output_dir,
        &theme_dir,
        &body_end,
    )
    .await?;
    if report.fallback {
        tracing::warn!(content = %build_config.content, "serving the fallback page");
    }

    let server_config = LiveServerConfig {
        host: build_config.host.clone(),
        port: build_config.port,
        root: output_dir,
        open: build_config.open,
        ignore: vec![".git".to_string(), "*.tmp".to_string()],
        routes: Some(search_routes(SearchState {
            content: build_config.content.clone(),
            reveal: config.site.render.reveal,
        })),
    };

    let server = LiveServer::new(server_config);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "dev server stopped");
        }
    });

    let watch_args = args.clone();
    let watcher_handle = tokio::spawn(async move {
        if let Err(e) = watch_source_files(watch_args, config, body_end).await {
            tracing::error!(error = %e, "source watcher stopped");
        }
    });

    let _ = tokio::try_join!(server_handle, watcher_handle)?;

    Ok(())
}

#[derive(Clone)]
struct SearchState {
    content: String,
    reveal: RevealStyle,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

fn search_routes(state: SearchState) -> Router {
    Router::new()
        .route(SEARCH_ENDPOINT, get(search_handler))
        .with_state(state)
}

/// Grid markup for the project search box, reading the content fresh on
/// every request so edits show up without a rebuild.
async fn search_handler(
    State(state): State<SearchState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let source = source_for(&state.content);
    let doc = match source.load().await {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!(error = %e, "search could not load content");
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    let mut ctx = RenderContext::new(doc.site.layout.unwrap_or_default(), state.reveal);
    match search_document(&doc, &params.q, &mut ctx) {
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, "no projects section").into_response(),
    }
}

/// Render settings re-read for a rebuild. Paths, host and port stay as the
/// server started with; a config that no longer loads keeps `current`.
fn reload_site_config(
    args: &ArgMatches,
    current: &folio_core::Config,
    host: &str,
    port: u16,
) -> folio_core::Config {
    match FolioConfig::load(args) {
        Ok(fresh) => {
            let mut site = fresh.site;
            site.dev(host.to_string(), port);
            site
        }
        Err(e) => {
            tracing::warn!(error = %e, "config no longer loads, keeping previous settings");
            current.clone()
        }
    }
}

async fn watch_source_files(args: ArgMatches, config: FolioConfig, body_end: String) -> Result<()> {
    let build_config = config.build_config();
    let host = build_config.host.clone();
    let port = build_config.port;
    let mut site_config = config.site.clone();
    let content = build_config.content.clone();
    let output_dir = PathBuf::from(&build_config.output);
    let theme_dir = PathBuf::from(&build_config.theme);
    let config_file = PathBuf::from(&build_config.config);

    let site_dir = if content.contains("://") {
        None
    } else {
        Path::new(&content).parent().map(|p| {
            if p.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                p.to_path_buf()
            }
        })
    };

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    let _ = tx.blocking_send(event.path);
                }
            }
        },
    )?;

    let mut watched = Vec::new();
    if let Some(site_dir) = &site_dir {
        debouncer
            .watcher()
            .watch(site_dir, notify::RecursiveMode::Recursive)?;
        tracing::info!("Watching site directory: {}", site_dir.display());
        watched.push(site_dir.clone());
    }

    if theme_dir.exists() {
        debouncer
            .watcher()
            .watch(&theme_dir, notify::RecursiveMode::Recursive)?;
        tracing::info!("Watching theme directory: {}", theme_dir.display());
        watched.push(theme_dir.clone());
    }

    if config_file.exists() {
        debouncer
            .watcher()
            .watch(&config_file, notify::RecursiveMode::NonRecursive)?;
        tracing::info!("Watching config file: {}", config_file.display());
        watched.push(config_file.clone());
    }

    let watched: Vec<PathBuf> = watched
        .into_iter()
        .map(|p| p.canonicalize().unwrap_or(p))
        .collect();
    let abs_output = output_dir.canonicalize().unwrap_or(output_dir.clone());

    while let Some(path) = rx.recv().await {
        let abs_path = path.canonicalize().unwrap_or(path.clone());

        // The output dir may sit inside the site dir; its writes are not edits.
        if abs_path.starts_with(&abs_output) || !watched.iter().any(|w| abs_path.starts_with(w)) {
            continue;
        }

        tracing::info!(path = %path.display(), "source changed, rebuilding");
        site_config = reload_site_config(&args, &site_config, &host, port);
        match build_site(&site_config, &content, &output_dir, &theme_dir, &body_end).await {
            Ok(report) if report.fallback => {
                tracing::warn!("rebuilt with the fallback page");
            }
            Ok(_) => tracing::info!("Site rebuilt successfully"),
            Err(e) => tracing::error!(error = %e, "rebuild failed"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Layout;

    fn args_for(config_path: &Path) -> ArgMatches {
        make_subcommand()
            .try_get_matches_from(["serve", "--config", config_path.to_str().unwrap()])
            .unwrap()
    }

    #[test]
    fn test_reload_picks_up_config_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[render]\nlayout = \"single-page\"\n").unwrap();
        let args = args_for(&path);
        let current = FolioConfig::load(&args).unwrap().site;

        std::fs::write(&path, "[render]\nlayout = \"multi-page\"\nprotection = true\n").unwrap();
        let reloaded = reload_site_config(&args, &current, "127.0.0.1", 4000);

        assert_eq!(reloaded.render.layout, Some(Layout::MultiPage));
        assert!(reloaded.render.protection);
        let dev = reloaded.dev.unwrap();
        assert_eq!((dev.host.as_str(), dev.port), ("127.0.0.1", 4000));
    }

    #[test]
    fn test_reload_keeps_previous_settings_on_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[render]\nreveal = \"staggered\"\n").unwrap();
        let args = args_for(&path);
        let current = FolioConfig::load(&args).unwrap().site;

        std::fs::write(&path, "[render]\nreveal = \"sideways\"\n").unwrap();
        let reloaded = reload_site_config(&args, &current, "127.0.0.1", 4000);

        assert_eq!(reloaded.render.reveal, RevealStyle::Staggered);
    }
}
