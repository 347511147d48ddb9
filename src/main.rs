mod config;
mod pipeline;
mod web;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::pipeline::extract::gemini::GeminiClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let app_config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // reqwest::blocking clients must be constructed off the async runtime.
    let gemini = app_config.gemini.clone();
    let client = match tokio::task::spawn_blocking(move || Arc::new(GeminiClient::new(&gemini)))
        .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to initialize Gemini client: {e}");
            std::process::exit(1);
        }
    };

    let mut server = match web::server::start_server(&app_config, client).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(addr = %app_config.bind_addr, "failed to start server: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %server.addr, "listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
