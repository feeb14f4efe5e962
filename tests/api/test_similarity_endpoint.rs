// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/paper/similarity

use super::support::*;
use axum::http::StatusCode;
use embedding_gateway::{
    api::{create_router, similarity::DEFAULT_MAX_TOP_K, AppState},
    embeddings::HashEncoder,
    scoring::{IndexedPaper, PaperIndex, SectionEmbeddings, VectorIndexScorer},
};
use serde_json::{json, Value};
use std::sync::Arc;

const PATH: &str = "/api/paper/similarity";

fn similarities(response: &Value) -> Vec<f64> {
    response["similarPapers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["similarity"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_top_k_three_sorted_descending() {
    let body = json!({"embeddings": {"abstract": [0.1, 0.2, 0.3]}, "top_k": 3});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    let scores = similarities(&response);
    assert_eq!(scores.len(), 3);
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "{:?}", scores);
    }
    for paper in response["similarPapers"].as_array().unwrap() {
        for key in ["paperId", "title", "similarity", "url"] {
            assert!(paper.get(key).is_some(), "missing {}", key);
        }
    }
}

#[tokio::test]
async fn test_default_top_k_is_five() {
    let body = json!({"embeddings": {"conclusion": [0.4, 0.5]}});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(similarities(&response).len(), 5);
}

#[tokio::test]
async fn test_uniqueness_score_range_over_repeated_calls() {
    let app = test_app();
    for _ in 0..50 {
        let body = json!({"embeddings": {}, "top_k": 2});
        let (status, response) = post_json(app.clone(), PATH, body).await;

        assert_eq!(status, StatusCode::OK);
        let score = response["uniquenessScore"].as_u64().expect("integer score");
        assert!((70..=100).contains(&score), "score {}", score);
        for similarity in similarities(&response) {
            assert!((0.5..=0.9).contains(&similarity));
        }
    }
}

#[tokio::test]
async fn test_missing_embeddings_is_400() {
    let (status, response) = post_json(test_app(), PATH, json!({"top_k": 3})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "No embeddings provided");
}

#[tokio::test]
async fn test_top_k_edge_values() {
    // Zero and negative values yield an empty list rather than an error
    for top_k in [json!(0), json!(-2)] {
        let body = json!({"embeddings": {}, "top_k": top_k});
        let (status, response) = post_json(test_app(), PATH, body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(similarities(&response).is_empty());
    }

    let body = json!({"embeddings": {}, "top_k": "4"});
    let (status, response) = post_json(test_app(), PATH, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(similarities(&response).len(), 4);

    let body = json!({"embeddings": {}, "top_k": "lots"});
    let (status, _) = post_json(test_app(), PATH, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_max_top_k_is_applied() {
    let state = hash_state().with_max_top_k(2);
    let body = json!({"embeddings": {}, "top_k": 10});
    let (status, response) = post_json(create_router(state), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(similarities(&response).len(), 2);
}

#[tokio::test]
async fn test_huge_top_k_does_not_break_later_requests() {
    let app = test_app();

    let body = json!({"embeddings": {}, "top_k": i64::MAX});
    let (status, response) = post_json(app.clone(), PATH, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(similarities(&response).len(), DEFAULT_MAX_TOP_K);

    let body = json!({"embeddings": {"abstract": [0.1, 0.2]}, "top_k": 3});
    let (status, response) = post_json(app, PATH, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(similarities(&response).len(), 3);
}

#[tokio::test]
async fn test_non_finite_query_values_are_400() {
    let body = json!({"embeddings": {"abstract": [1e39, 0.0]}});
    let (status, response) = post_json(test_app(), PATH, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid embeddings"));
}

#[tokio::test]
async fn test_vector_index_scorer_behind_endpoint() {
    let mut near = SectionEmbeddings::new();
    near.insert("abstract".to_string(), vec![1.0, 0.0]);
    let mut far = SectionEmbeddings::new();
    far.insert("abstract".to_string(), vec![0.0, 1.0]);

    let index = PaperIndex::new(vec![
        IndexedPaper {
            paper_id: "far".to_string(),
            title: "Far".to_string(),
            url: "https://example.org/far".to_string(),
            embeddings: far,
        },
        IndexedPaper {
            paper_id: "near".to_string(),
            title: "Near".to_string(),
            url: "https://example.org/near".to_string(),
            embeddings: near,
        },
    ])
    .unwrap();

    let encoder = HashEncoder::new(TEST_MODEL, 2).unwrap();
    let state = AppState::new(Arc::new(encoder), Arc::new(VectorIndexScorer::new(index)));

    let body = json!({"embeddings": {"abstract": [1.0, 0.0]}, "top_k": 1});
    let (status, response) = post_json(create_router(state), PATH, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["similarPapers"][0]["paperId"], "near");
    assert_eq!(response["similarPapers"][0]["similarity"], 1.0);
    // mean(1.0, 0.0) = 0.5 -> 50
    assert_eq!(response["uniquenessScore"], 50);
}
