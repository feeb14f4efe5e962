// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod http_server;
pub mod similarity;

pub use embed::{embeddings_handler, paper_embeddings_handler, EmbeddingsResponse};
pub use errors::ApiError;
pub use extract::JsonPayload;
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_router, start_server, AppState};
pub use similarity::similarity_handler;
