//! HTTP shell serving the pre-rendered page.
//!
//! The bootstrap script is inlined in `<head>` so the theme is on the root
//! element before the first paint, well before the client bundle mounts.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::app::components::layout::{CUSTOM_STYLES, PICO_CSS};
use crate::config::ServerConfig;
use crate::script::{bootstrap_script, script_tag};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    page: Arc<str>,
    script: Arc<str>,
    started: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        // Configuration is fixed for the process, so render once
        let page = render_shell(&config).into();
        let script = bootstrap_script(&config.theme).into();
        Self {
            config: Arc::new(config),
            page,
            script,
            started: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/theme.js", get(theme_script_handler))
        .route("/status", get(status_handler));

    if let Some(dir) = &state.config.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router
        // Client-side routes get the same shell
        .fallback(index_handler)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTML shell for every page
pub fn render_shell(config: &ServerConfig) -> String {
    let client = config
        .client_entry
        .as_deref()
        .map(|entry| {
            format!(
                "<script type=\"module\">import init from {}; init();</script>",
                serde_json::to_string(entry).unwrap_or_default()
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{bootstrap}
<link rel="stylesheet" href="{pico}">
<style>{styles}</style>
</head>
<body>
<div id="main"><main class="container"><h1>{title}</h1></main></div>
{client}
</body>
</html>
"#,
        title = escape_html(&config.title),
        bootstrap = script_tag(&config.theme),
        pico = PICO_CSS,
        styles = CUSTOM_STYLES,
        client = client,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// GET / - Page shell with the bootstrap script inlined
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

/// GET /theme.js - The bootstrap script alone
pub async fn theme_script_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        state.script.to_string(),
    )
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub storage_key: String,
    pub themes: Vec<String>,
    pub forced_theme: Option<String>,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let theme = &state.config.theme;
    Json(StatusResponse {
        service: "theme-sync",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        storage_key: theme.storage_key.clone(),
        themes: theme.selectable_themes(),
        forced_theme: theme.forced_theme.clone(),
    })
}
