// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use embedding_gateway::{
    api::{start_server, AppState},
    config::ServiceConfig,
    embeddings::load_encoder,
    scoring::{MockScorer, PaperIndex, SimilarityScorer, VectorIndexScorer},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let config = ServiceConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting embedding gateway v{}", embedding_gateway::VERSION);

    let encoder = load_encoder(&config).await?;
    info!(
        "✅ Model '{}' loaded successfully ({} dimensions)",
        encoder.model_name(),
        encoder.dimension()
    );

    let scorer: Arc<dyn SimilarityScorer> = match &config.paper_index {
        Some(path) => Arc::new(VectorIndexScorer::new(PaperIndex::from_file(path)?)),
        None => Arc::new(MockScorer::new()),
    };
    info!("Similarity scorer: {}", scorer.name());

    let state = AppState::new(encoder, scorer).with_max_top_k(config.max_top_k);
    let addr = config.bind_addr()?;

    info!(
        "Starting embedding service on port {}, debug mode: {}",
        config.port,
        config.debug()
    );

    start_server(state, addr).await
}
