// src/main.rs

use exam_portal::attempt::session::InMemorySessionStore;
use exam_portal::config::Config;
use exam_portal::routes;
use exam_portal::state::AppState;
use exam_portal::store::SqliteStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for name in config.insecure_defaults() {
        tracing::warn!("{} is set to the built-in default, override it in production", name);
    }

    // Open the database, retrying while it is locked or unavailable
    let mut retry_count = 0;
    let store = loop {
        match SqliteStore::connect(&config.database_url).await {
            Ok(store) => break store,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to open database after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    store.migrate().await?;
    tracing::info!("Migrations applied successfully.");

    if config.enforce_deadline {
        tracing::info!("Late exam submissions will be rejected");
    }

    let port = config.port;
    let state = AppState {
        store,
        sessions: Arc::new(InMemorySessionStore::new()),
        config,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
