// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response bodies for the embedding endpoints

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// `{"embeddings": ...}` envelope shared by both endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResponse<T> {
    pub embeddings: T,
}

/// Vectors for the four submission fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEmbeddings {
    pub problem_statement: Vec<f32>,
    pub proposed_solution: Vec<f32>,
    pub description: Vec<f32>,
    pub domain: Vec<f32>,
}

impl SubmissionEmbeddings {
    /// Builds from vectors in `SUBMISSION_FIELDS` order
    pub fn from_ordered(vectors: Vec<Vec<f32>>) -> Result<Self, ApiError> {
        let count = vectors.len();
        let [problem_statement, proposed_solution, description, domain]: [Vec<f32>; 4] =
            vectors.try_into().map_err(|_| {
                ApiError::Internal(format!("Encoder returned {} embeddings, expected 4", count))
            })?;

        Ok(Self {
            problem_statement,
            proposed_solution,
            description,
            domain,
        })
    }
}

/// Vectors for the supplied paper sections; absent sections are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperEmbeddings {
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none", default)]
    pub abstract_text: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conclusion: Option<Vec<f32>>,
}

impl PaperEmbeddings {
    pub fn set(&mut self, section: &str, vector: Vec<f32>) -> Result<(), ApiError> {
        match section {
            "abstract" => self.abstract_text = Some(vector),
            "conclusion" => self.conclusion = Some(vector),
            other => return Err(ApiError::Internal(format!("Unknown paper section: {}", other))),
        }
        Ok(())
    }
}
