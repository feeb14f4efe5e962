// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Gateway
//!
//! HTTP service exposing a pretrained sentence-embedding model:
//! - `POST /api/embeddings`: embeds the four submission fields
//! - `POST /api/paper/embeddings`: embeds a paper's abstract and/or conclusion
//! - `POST /api/paper/similarity`: uniqueness score and similar papers
//! - `GET /api/health`: liveness and loaded model name

pub mod api;
pub mod config;
pub mod embeddings;
pub mod scoring;

pub use api::{create_router, ApiError, AppState};
pub use config::ServiceConfig;
pub use embeddings::{HashEncoder, OnnxEmbeddingModel, TextEncoder};
pub use scoring::{MockScorer, SimilarityReport, SimilarityScorer, VectorIndexScorer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model served when none is configured
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";
