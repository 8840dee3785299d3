//! Theme Sync
//!
//! With the `server` feature this serves the HTML shell carrying the
//! bootstrap script. Without it (the WASM client build) it launches the app.

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use theme_sync::{config, server};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theme_sync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Theme Sync");

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(?config, "Configuration loaded");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = server::router(server::AppState::new(config));

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(theme_sync::app::App);
}
