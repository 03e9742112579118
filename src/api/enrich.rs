//! Enrichment endpoint
//!
//! One result per input item, same order, never fewer. A failed item becomes
//! `status: "error"` alongside successful items; the batch itself never fails.

use axum::{extract::State, routing::post, Json, Router};

use crate::models::{EnrichRequest, EnrichResponse, EnrichResult};
use crate::AppState;

/// POST /enrich
pub async fn enrich(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> Json<EnrichResponse> {
    let mut results = Vec::with_capacity(request.items.len());

    for item in &request.items {
        let (record, warnings) = state.enricher.enrich_item(item).await;
        let error = warnings.first().cloned();
        results.push(EnrichResult {
            record,
            status: if error.is_none() { "success" } else { "error" }.to_string(),
            error,
        });
    }

    Json(EnrichResponse { results })
}

/// Build enrichment routes
pub fn enrich_routes() -> Router<AppState> {
    Router::new().route("/enrich", post(enrich))
}
