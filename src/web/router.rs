//! Report routes: the upload form, the upload handler, and static serving
//! of the sample-reports directory.
//!
//! Every pipeline outcome renders as HTTP 200; failure is communicated only
//! through the rendered `status`/`reason`, never as an HTTP error.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::pipeline::extract::types::reason;
use crate::pipeline::extract::StructuredResult;
use crate::pipeline::ReportPipeline;
use crate::web::render;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// State shared by the report routes.
pub struct WebState {
    pub pipeline: ReportPipeline,
}

/// Build the application router.
///
/// `ServeDir` rejects path traversal outside `sample_dir` on its own.
pub fn report_router(state: Arc<WebState>, sample_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index).post(upload_report))
        .nest_service("/sample_reports", ServeDir::new(sample_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(render::render_page(None, ""))
}

async fn upload_report(
    State(state): State<Arc<WebState>>,
    mut multipart: Multipart,
) -> Html<String> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("report") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, bytes.to_vec())),
            Err(e) => tracing::warn!("failed to read upload bytes: {e}"),
        }
    }

    // No file (or nameless part) re-renders the empty state, like a fresh GET.
    let Some((filename, bytes)) = upload.filter(|(name, _)| !name.is_empty()) else {
        return Html(render::render_page(None, ""));
    };

    tracing::info!(%filename, size = bytes.len(), "processing uploaded report");

    // The pipeline is synchronous (blocking OCR and model call), so it runs
    // off the async runtime.
    let result = {
        let state = state.clone();
        let filename = filename.clone();
        tokio::task::spawn_blocking(move || state.pipeline.process(&bytes, &filename))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("pipeline task failed: {e}");
                StructuredResult::unprocessed(reason::MODEL_TRANSPORT)
            })
    };

    Html(render::render_page(Some(&result), &filename))
}
