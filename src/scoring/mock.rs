// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Placeholder scorer: random results that ignore the submitted vectors

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

use super::{round2, SectionEmbeddings, SimilarPaper, SimilarityReport, SimilarityScorer};

/// Inclusive range of the fabricated uniqueness score
pub const UNIQUENESS_RANGE: (u32, u32) = (70, 100);

/// Range of the fabricated per-paper similarity
pub const SIMILARITY_RANGE: (f64, f64) = (0.5, 0.9);

/// Returns a uniformly random uniqueness score and `top_k` synthetic papers
/// with uniformly random similarities.
#[derive(Debug)]
pub struct MockScorer {
    rng: Mutex<StdRng>,
}

impl MockScorer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence, for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer for MockScorer {
    fn score(&self, _embeddings: &SectionEmbeddings, top_k: usize) -> Result<SimilarityReport> {
        let mut similarities = Vec::new();
        similarities
            .try_reserve_exact(top_k)
            .map_err(|e| anyhow!("Cannot allocate {} similarity records: {}", top_k, e))?;

        // Only the draws run under the lock
        let uniqueness_score = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            similarities.extend(
                (0..top_k).map(|_| rng.gen_range(SIMILARITY_RANGE.0..=SIMILARITY_RANGE.1)),
            );
            rng.gen_range(UNIQUENESS_RANGE.0..=UNIQUENESS_RANGE.1)
        };

        let mut papers = Vec::new();
        papers
            .try_reserve_exact(top_k)
            .map_err(|e| anyhow!("Cannot allocate {} similarity records: {}", top_k, e))?;
        papers.extend(
            similarities
                .into_iter()
                .enumerate()
                .map(|(i, similarity)| SimilarPaper {
                    paper_id: format!("paper{}", i + 1),
                    title: format!("Paper Title {}", i + 1),
                    similarity: round2(similarity),
                    url: format!("https://example.com/paper{}", i + 1),
                }),
        );

        Ok(SimilarityReport::new(uniqueness_score, papers))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
