use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::assets::resolve_photo;
use crate::documents::ExportRequest;
use crate::errors::AppError;
use crate::render::render_document;
use crate::state::AppState;

/// POST /export
/// Renders a CV or an analysis report and returns it as a PDF attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
    let request = ExportRequest::from_value(value)?;
    let kind = request.kind();
    let now = Utc::now();

    let document = match &request {
        ExportRequest::Cv(cv) => {
            let photo = resolve_photo(state.photos.as_ref(), cv.photo_url()).await;
            cv.prepare(photo, state.cv_geometry, now)
        }
        ExportRequest::Analysis(report) => {
            report.prepare(state.report_geometry, &state.theme, now)?
        }
    };

    // Layout and PDF serialisation are CPU-bound.
    let theme = state.theme.clone();
    let filename = document.filename.clone();
    let (pdf, summary) = tokio::task::spawn_blocking(move || render_document(&document, &theme))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    info!(
        kind,
        pages = summary.page_count,
        blocks = summary.blocks_placed,
        assets_skipped = summary.assets_skipped,
        bytes = pdf.len(),
        %filename,
        "Rendered export"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
