// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Paper similarity API Module
//!
//! `POST /api/paper/similarity`, delegating to the configured
//! [`SimilarityScorer`](crate::scoring::SimilarityScorer).

pub mod handler;
pub mod request;

pub use handler::similarity_handler;
pub use request::{SimilarityRequest, DEFAULT_MAX_TOP_K, DEFAULT_TOP_K};
