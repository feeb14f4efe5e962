// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::embed::{embeddings_handler, paper_embeddings_handler};
use super::handlers::health_handler;
use super::similarity::{similarity_handler, DEFAULT_MAX_TOP_K};
use crate::embeddings::TextEncoder;
use crate::scoring::SimilarityScorer;

/// State shared by every handler
///
/// Built once at startup; the encoder and scorer are only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub encoder: Arc<dyn TextEncoder>,
    pub scorer: Arc<dyn SimilarityScorer>,
    /// Identifier reported by the health endpoint
    pub model_name: Arc<str>,
    /// Ceiling for the similarity `top_k`
    pub max_top_k: usize,
}

impl AppState {
    pub fn new(encoder: Arc<dyn TextEncoder>, scorer: Arc<dyn SimilarityScorer>) -> Self {
        let model_name = Arc::from(encoder.model_name());
        Self {
            encoder,
            scorer,
            model_name,
            max_top_k: DEFAULT_MAX_TOP_K,
        }
    }

    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("model_name", &self.model_name)
            .field("dimension", &self.encoder.dimension())
            .field("scorer", &self.scorer.name())
            .field("max_top_k", &self.max_top_k)
            .finish()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/embeddings", post(embeddings_handler))
        .route("/api/paper/embeddings", post(paper_embeddings_handler))
        .route("/api/paper/similarity", post(similarity_handler))
        .route("/api/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serves the router until Ctrl-C
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Embedding service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Embedding service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
