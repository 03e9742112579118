//! Upload endpoint
//!
//! Accepts a multipart spreadsheet/CSV upload and returns the part numbers
//! and deduplicated manufacturers found in it.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::services::tabular;
use crate::AppState;

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Part numbers in row order
    pub mpns: Vec<String>,
    /// Manufacturers, deduplicated, first-seen order
    pub manufacturers: Vec<String>,
}

/// POST /upload
///
/// 400 on a missing file part, unsupported format, unreadable content, or a
/// file without a recognizable part-number column.
pub async fn upload(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;

    let items = tabular::read_input(&bytes, &filename).map_err(|e| {
        error!(filename = %filename, error = %e, "Upload failed");
        ApiError::BadRequest(e.to_string())
    })?;

    let mpns: Vec<String> = items.iter().map(|item| item.mpn.clone()).collect();
    let mut manufacturers: Vec<String> = Vec::new();
    for item in &items {
        if !item.manufacturer.is_empty() && !manufacturers.contains(&item.manufacturer) {
            manufacturers.push(item.manufacturer.clone());
        }
    }

    Ok(Json(UploadResponse {
        mpns,
        manufacturers,
    }))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}
