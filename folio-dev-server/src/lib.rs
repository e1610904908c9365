use anyhow::Result;
use axum::{
    Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

/// Websocket route browsers listen on for reload signals.
pub const LIVERELOAD_PATH: &str = "/__livereload";

/// Configuration for the live development server
#[derive(Debug, Clone)]
pub struct LiveServerConfig {
    pub host: String,
    pub port: u16,
    /// Built site to serve and watch
    pub root: PathBuf,
    /// Auto-open browser
    pub open: bool,
    /// Path fragments, or `*.ext` suffixes, that never trigger a reload
    pub ignore: Vec<String>,
    /// Extra routes answered before falling through to static files
    pub routes: Option<Router>,
}

impl Default for LiveServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("./out"),
            open: false,
            ignore: vec![],
            routes: None,
        }
    }
}

/// Serves the built site and tells connected pages to reload when it changes.
pub struct LiveServer {
    config: LiveServerConfig,
}

impl LiveServer {
    pub fn new(config: LiveServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        let (reload_tx, _) = broadcast::channel::<String>(100);

        if !self.config.root.exists() {
            return Err(anyhow::anyhow!(
                "Root directory does not exist: {}",
                self.config.root.display()
            ));
        }

        let state = AppState {
            reload_tx: reload_tx.clone(),
        };

        let watch_path = self.config.root.clone();
        let ignore_patterns = self.config.ignore.clone();
        tokio::spawn(async move {
            if let Err(e) = start_file_watcher(watch_path, reload_tx, ignore_patterns).await {
                tracing::error!(error = %e, "output watcher stopped");
            }
        });

        let mut app = Router::new()
            .route(LIVERELOAD_PATH, get(websocket_handler))
            .with_state(state);
        if let Some(routes) = self.config.routes {
            app = app.merge(routes);
        }
        let app = app.fallback_service(ServeDir::new(&self.config.root));

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("Serving at http://{addr}");
        tracing::info!(root = %self.config.root.display(), "live reload on ws://{addr}{LIVERELOAD_PATH}");

        if self.config.open {
            if let Err(e) = open::that(format!("http://{addr}")) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    reload_tx: broadcast::Sender<String>,
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| websocket_connection(socket, state.reload_tx))
}

async fn websocket_connection(mut socket: WebSocket, reload_tx: broadcast::Sender<String>) {
    let mut rx = reload_tx.subscribe();

    if socket
        .send(Message::Text("connected".to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            msg = rx.recv() => {
                match msg {
                    Ok(reload_msg) => {
                        if socket.send(Message::Text(reload_msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            msg = socket.recv() => {
                if msg.is_none() {
                    break;
                }
            }
        }
    }
}

/// Whether a changed path matches one of the ignore patterns.
pub fn is_ignored(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| match pattern.strip_prefix('*') {
        Some(suffix) => path_str.ends_with(suffix),
        None => path_str.contains(pattern.as_str()),
    })
}

async fn start_file_watcher(
    watch_path: PathBuf,
    reload_tx: broadcast::Sender<String>,
    ignore_patterns: Vec<String>,
) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    if !is_ignored(&event.path, &ignore_patterns) {
                        let _ = tx.blocking_send(event.path);
                    }
                }
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&watch_path, notify::RecursiveMode::Recursive)?;

    tracing::debug!(path = %watch_path.display(), "watching output");

    // One reload per burst of writes from a rebuild.
    let mut last_reload: Option<Instant> = None;
    while let Some(path) = rx.recv().await {
        tracing::debug!(path = %path.display(), "output changed");

        let now = Instant::now();
        if last_reload.is_none_or(|at| now.duration_since(at) > Duration::from_millis(1000)) {
            let _ = reload_tx.send("reload".to_string());
            last_reload = Some(now);
            tracing::info!("sent reload signal");
        }
    }

    Ok(())
}

/// Markup that reconnects a page to the live reload socket at `host:port`.
pub fn livereload_script(host: &str, port: u16) -> String {
    format!(
        r#"<script>
(function() {{
    const socket = new WebSocket('ws://{host}:{port}{LIVERELOAD_PATH}');
    socket.onmessage = function(event) {{
        if (event.data === 'reload') {{
            location.reload();
        }}
    }};
    socket.onclose = function() {{
        console.log('Live reload disconnected');
    }};
}})();
</script>"#
    )
}
