// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Brute-force vector search over an in-memory paper index
//!
//! The index is a JSON array loaded once at startup:
//!
//! ```json
//! [
//!   {
//!     "paperId": "p-17",
//!     "title": "Attention Is All You Need",
//!     "url": "https://example.org/p-17",
//!     "embeddings": { "abstract": [0.01, ...], "conclusion": [0.03, ...] }
//!   }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{round2, SectionEmbeddings, SimilarPaper, SimilarityReport, SimilarityScorer};

/// Number of best matches averaged into the uniqueness score
pub const UNIQUENESS_WINDOW: usize = 3;

/// A known paper and its section embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPaper {
    pub paper_id: String,
    pub title: String,
    pub url: String,
    pub embeddings: SectionEmbeddings,
}

/// Papers searched by [`VectorIndexScorer`]
#[derive(Debug, Clone, Default)]
pub struct PaperIndex {
    papers: Vec<IndexedPaper>,
}

impl PaperIndex {
    pub fn new(papers: Vec<IndexedPaper>) -> Result<Self> {
        for paper in &papers {
            for (section, vector) in &paper.embeddings {
                if vector.iter().any(|v| !v.is_finite()) {
                    anyhow::bail!(
                        "Paper {} section {} contains NaN or Infinity",
                        paper.paper_id,
                        section
                    );
                }
            }
        }

        Ok(Self { papers })
    }

    /// Loads an index from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read paper index {}", path.display()))?;
        let papers: Vec<IndexedPaper> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse paper index {}", path.display()))?;

        let index = Self::new(papers)?;
        info!("Loaded paper index with {} papers from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn papers(&self) -> &[IndexedPaper] {
        &self.papers
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Ranks indexed papers by mean cosine similarity over shared sections.
///
/// Uniqueness is `100 - mean(top 3 similarities) * 100`, clamped to
/// `[0, 100]`; a paper with no comparable neighbours scores 100.
#[derive(Debug, Clone)]
pub struct VectorIndexScorer {
    index: PaperIndex,
}

impl VectorIndexScorer {
    pub fn new(index: PaperIndex) -> Self {
        Self { index }
    }

    fn paper_similarity(query: &SectionEmbeddings, paper: &IndexedPaper) -> Option<f64> {
        let scores: Vec<f64> = query
            .iter()
            .filter_map(|(section, vector)| {
                paper
                    .embeddings
                    .get(section)
                    .map(|other| cosine_similarity(vector, other) as f64)
            })
            .collect();

        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

impl SimilarityScorer for VectorIndexScorer {
    fn score(&self, embeddings: &SectionEmbeddings, top_k: usize) -> Result<SimilarityReport> {
        let mut ranked: Vec<(f64, &IndexedPaper)> = self
            .index
            .papers()
            .iter()
            .filter_map(|paper| Self::paper_similarity(embeddings, paper).map(|s| (s, paper)))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let window = &ranked[..ranked.len().min(UNIQUENESS_WINDOW)];
        let uniqueness_score = if window.is_empty() {
            100
        } else {
            let mean = window.iter().map(|(s, _)| *s).sum::<f64>() / window.len() as f64;
            (100.0 - mean * 100.0).round().clamp(0.0, 100.0) as u32
        };

        let papers = ranked
            .into_iter()
            .take(top_k)
            .map(|(similarity, paper)| SimilarPaper {
                paper_id: paper.paper_id.clone(),
                title: paper.title.clone(),
                similarity: round2(similarity),
                url: paper.url.clone(),
            })
            .collect();

        Ok(SimilarityReport::new(uniqueness_score, papers))
    }

    fn name(&self) -> &'static str {
        "vector-index"
    }
}
