// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/embeddings

use super::support::*;
use axum::http::StatusCode;
use embedding_gateway::embeddings::{HashEncoder, TextEncoder};
use serde_json::json;

const PATH: &str = "/api/embeddings";

fn full_body() -> serde_json::Value {
    json!({
        "problemStatement": "Farmers lack timely crop disease diagnosis",
        "proposedSolution": "A phone app that classifies leaf photos",
        "description": "Offline-capable image classifier with local language UI",
        "domain": "Agriculture"
    })
}

#[tokio::test]
async fn test_all_fields_return_four_vectors() {
    let (status, body) = post_json(test_app(), PATH, full_body()).await;

    assert_eq!(status, StatusCode::OK);
    let embeddings = body["embeddings"].as_object().expect("embeddings object");
    assert_eq!(embeddings.len(), 4);
    for field in ["problemStatement", "proposedSolution", "description", "domain"] {
        assert_eq!(vector_len(&embeddings[field]), TEST_DIMENSION, "field {}", field);
    }
}

#[tokio::test]
async fn test_vectors_match_encoder_output() {
    let (_, body) = post_json(test_app(), PATH, full_body()).await;

    let encoder = HashEncoder::new(TEST_MODEL, TEST_DIMENSION).unwrap();
    let expected = encoder.encode("Agriculture").await.unwrap();
    let actual: Vec<f32> = serde_json::from_value(body["embeddings"]["domain"].clone()).unwrap();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_each_missing_field_is_reported() {
    for field in ["problemStatement", "proposedSolution", "description", "domain"] {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove(field);

        let (status, response) = post_json(test_app(), PATH, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing required fields");
        assert_eq!(response["missing_fields"], json!([field]));
    }
}

#[tokio::test]
async fn test_empty_fields_count_as_missing() {
    let body = json!({
        "problemStatement": "",
        "proposedSolution": "something",
        "description": "",
        "domain": "Health"
    });

    let (status, response) = post_json(test_app(), PATH, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["missing_fields"], json!(["problemStatement", "description"]));
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let (status, response) = post_json(failing_app(), PATH, full_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "ONNX runtime error: session crashed");
}

#[tokio::test]
async fn test_validation_runs_before_inference() {
    // A failing encoder must not turn a 400 into a 500
    let (status, _) = post_json(failing_app(), PATH, json!({"domain": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
