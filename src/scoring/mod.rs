// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Paper similarity scoring
//!
//! `SimilarityScorer` turns a paper's section embeddings into a uniqueness
//! score and a ranked list of similar papers. `MockScorer` fabricates
//! content-independent results; `VectorIndexScorer` searches a loaded index.

pub mod mock;
pub mod vector_index;

pub use mock::MockScorer;
pub use vector_index::{IndexedPaper, PaperIndex, VectorIndexScorer};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Section name to embedding vector (e.g. "abstract", "conclusion")
pub type SectionEmbeddings = BTreeMap<String, Vec<f32>>;

/// One entry of the similar-papers list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarPaper {
    pub paper_id: String,
    pub title: String,
    pub similarity: f64,
    pub url: String,
}

/// Response body of the similarity endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    pub uniqueness_score: u32,
    /// Sorted by similarity, highest first
    pub similar_papers: Vec<SimilarPaper>,
}

impl SimilarityReport {
    /// Builds a report, sorting papers by descending similarity
    pub fn new(uniqueness_score: u32, mut similar_papers: Vec<SimilarPaper>) -> Self {
        similar_papers.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Self {
            uniqueness_score,
            similar_papers,
        }
    }
}

pub trait SimilarityScorer: Send + Sync {
    /// Scores a paper against known papers, returning at most `top_k` matches
    fn score(&self, embeddings: &SectionEmbeddings, top_k: usize) -> Result<SimilarityReport>;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

/// Rounds to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
