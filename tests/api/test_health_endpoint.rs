// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /api/health

use super::support::*;
use axum::http::{Method, StatusCode};
use embedding_gateway::{
    api::{create_router, AppState},
    embeddings::HashEncoder,
    scoring::MockScorer,
};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_health_reports_model() {
    let (status, body) = send(test_app(), Method::GET, "/api/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "model": TEST_MODEL}));
}

#[tokio::test]
async fn test_health_uses_configured_identifier() {
    let encoder = HashEncoder::new("paraphrase-MiniLM-L3-v2", 8).unwrap();
    let state = AppState::new(Arc::new(encoder), Arc::new(MockScorer::new()));

    let (status, body) = send(create_router(state), Method::GET, "/api/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "paraphrase-MiniLM-L3-v2");
}

#[tokio::test]
async fn test_health_ignores_failing_encoder() {
    let (status, body) = send(failing_app(), Method::GET, "/api/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
