// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/paper/embeddings

use super::support::*;
use axum::http::StatusCode;
use serde_json::json;

const PATH: &str = "/api/paper/embeddings";

#[tokio::test]
async fn test_abstract_only() {
    let body = json!({"abstract": "We propose a new attention mechanism."});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    let embeddings = response["embeddings"].as_object().unwrap();
    assert_eq!(embeddings.len(), 1);
    assert_eq!(vector_len(&embeddings["abstract"]), TEST_DIMENSION);
    assert!(!embeddings.contains_key("conclusion"));
}

#[tokio::test]
async fn test_conclusion_only_with_empty_abstract() {
    let body = json!({"abstract": "", "conclusion": "Results generalise to other domains."});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    let embeddings = response["embeddings"].as_object().unwrap();
    assert_eq!(embeddings.keys().collect::<Vec<_>>(), vec!["conclusion"]);
}

#[tokio::test]
async fn test_both_sections() {
    let body = json!({"abstract": "a", "conclusion": "c"});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(vector_len(&response["embeddings"]["abstract"]), TEST_DIMENSION);
    assert_eq!(vector_len(&response["embeddings"]["conclusion"]), TEST_DIMENSION);
    assert_ne!(response["embeddings"]["abstract"], response["embeddings"]["conclusion"]);
}

#[tokio::test]
async fn test_neither_section_is_400() {
    for body in [
        json!({"title": "A paper"}),
        json!({"abstract": "", "conclusion": ""}),
        json!({"abstract": null}),
    ] {
        let (status, response) = post_json(test_app(), PATH, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["error"],
            "At least one of abstract or conclusion must be provided"
        );
    }
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let (status, response) = post_json(failing_app(), PATH, json!({"abstract": "a"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"].as_str().unwrap().contains("session crashed"));
}
