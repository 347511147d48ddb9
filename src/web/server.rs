//! HTTP server lifecycle: bind, mount the report router, serve in a
//! background task, shut down over a oneshot channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::config::AppConfig;
use crate::pipeline::extract::GenerativeClient;
use crate::pipeline::ReportPipeline;
use crate::web::router::{report_router, WebState};

/// Handle to a running report server.
pub struct ReportServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ReportServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("report server shutdown signal sent");
        }
    }
}

/// Bind the configured address and start serving in a background task.
pub async fn start_server(
    config: &AppConfig,
    client: Arc<dyn GenerativeClient>,
) -> Result<ReportServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(WebState {
        pipeline: ReportPipeline::new(client, config.tesseract_bin.clone()),
    });
    let app = report_router(state, &config.sample_reports_dir);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        tracing::info!(%addr, "report server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("report server error: {e}");
        }

        tracing::info!("report server stopped");
    });

    Ok(ReportServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
