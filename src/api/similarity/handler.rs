// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use super::request::SimilarityRequest;
use crate::api::extract::JsonPayload;
use crate::api::{ApiError, AppState};
use crate::scoring::SimilarityReport;

/// POST /api/paper/similarity
///
/// # Request Body
/// ```json
/// {"embeddings": {"abstract": [...], "conclusion": [...]}, "top_k": 5}
/// ```
///
/// # Response Body
/// ```json
/// {
///   "uniquenessScore": 85,
///   "similarPapers": [
///     {"paperId": "paper1", "title": "Paper Title 1", "similarity": 0.78, "url": "https://example.com/paper1"}
///   ]
/// }
/// ```
pub async fn similarity_handler(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<Json<SimilarityReport>, ApiError> {
    let request = SimilarityRequest::from_payload(&body, state.max_top_k)?;

    debug!(
        "Scoring paper with {} sections (top_k={}, scorer={})",
        request.embeddings.len(),
        request.top_k,
        state.scorer.name()
    );

    let report = state
        .scorer
        .score(&request.embeddings, request.top_k)
        .map_err(|e| {
            error!("Error calculating paper similarity: {:#}", e);
            ApiError::from(e)
        })?;

    Ok(Json(report))
}
