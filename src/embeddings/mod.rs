// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Text encoders
//!
//! `TextEncoder` is the seam between the HTTP layer and the model runtime.
//! The service holds exactly one encoder, built at startup and shared
//! read-only by every request handler.

pub mod model_manager;
pub mod onnx_model;

pub use model_manager::{load_encoder, resolve_model_files, ModelFiles};
pub use onnx_model::OnnxEmbeddingModel;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Produces fixed-length vectors from text
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encodes a single text
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encodes several texts, returning vectors in input order
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output dimension
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model
    fn model_name(&self) -> &str;
}

/// Scales a vector to unit length in place (zero vectors are left untouched)
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Deterministic pseudo embeddings seeded from a hash of the text
///
/// Identical texts always map to identical vectors. Used when no model files
/// are available (local development, tests).
#[derive(Debug, Clone)]
pub struct HashEncoder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl HashEncoder {
    pub fn new(model_name: impl Into<String>, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(anyhow!("Embedding dimension must be greater than 0"));
        }

        Ok(Self {
            model_name: model_name.into(),
            dimension,
            normalize: true,
        })
    }

    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut current_seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // Linear congruential step, mixed with the position
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);

            // Map to [-1, 1]
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        if self.normalize {
            l2_normalize(&mut embedding);
        }

        embedding
    }
}

#[async_trait]
impl TextEncoder for HashEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
