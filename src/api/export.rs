//! Export endpoint
//!
//! Serializes records into the fixed 16-column layout and returns the file
//! as a binary attachment.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::models::ExportRequest;
use crate::services::tabular::{self, TabularError};
use crate::AppState;

/// POST /export
///
/// 400 on an unsupported format; the response body is the xlsx or csv file
/// with a matching content type and `battery_export.<format>` filename.
pub async fn export(
    State(_state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Response> {
    let (bytes, content_type) =
        tabular::export_records(&request.records, &request.format).map_err(|e| {
            error!(format = %request.format, error = %e, "Export failed");
            match e {
                TabularError::UnsupportedFormat(_) => ApiError::BadRequest(e.to_string()),
                _ => ApiError::Internal(e.to_string()),
            }
        })?;

    let filename = format!("battery_export.{}", request.format.to_lowercase());

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Build export routes
pub fn export_routes() -> Router<AppState> {
    Router::new().route("/export", post(export))
}
