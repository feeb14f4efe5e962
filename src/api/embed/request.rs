// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request validation for the embedding endpoints
//!
//! A field counts as supplied only when it holds a non-empty string.
//! Absent keys, `null`, empty strings and non-string values are all treated
//! as missing.

use serde_json::{Map, Value};

use crate::api::ApiError;

/// Fields required by `POST /api/embeddings`, in response order
pub const SUBMISSION_FIELDS: [&str; 4] = ["problemStatement", "proposedSolution", "description", "domain"];

/// Sections accepted by `POST /api/paper/embeddings`
pub const PAPER_SECTIONS: [&str; 2] = ["abstract", "conclusion"];

fn supplied_text<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    match body.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    }
}

/// Validated body of `POST /api/embeddings`
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionEmbeddingRequest {
    pub problem_statement: String,
    pub proposed_solution: String,
    pub description: String,
    pub domain: String,
}

impl SubmissionEmbeddingRequest {
    /// Validates that all four fields are present and non-empty
    ///
    /// # Errors
    /// `ApiError::MissingFields` naming every missing field in
    /// [`SUBMISSION_FIELDS`] order.
    pub fn from_payload(body: &Map<String, Value>) -> Result<Self, ApiError> {
        let missing: Vec<String> = SUBMISSION_FIELDS
            .iter()
            .filter(|field| supplied_text(body, field).is_none())
            .map(|field| field.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let text = |field: &str| supplied_text(body, field).unwrap_or_default().to_string();

        Ok(Self {
            problem_statement: text("problemStatement"),
            proposed_solution: text("proposedSolution"),
            description: text("description"),
            domain: text("domain"),
        })
    }

    /// Texts in [`SUBMISSION_FIELDS`] order
    pub fn texts(&self) -> Vec<String> {
        vec![
            self.problem_statement.clone(),
            self.proposed_solution.clone(),
            self.description.clone(),
            self.domain.clone(),
        ]
    }
}

/// Validated body of `POST /api/paper/embeddings`
#[derive(Debug, Clone, PartialEq)]
pub struct PaperEmbeddingRequest {
    pub abstract_text: Option<String>,
    pub conclusion: Option<String>,
}

impl PaperEmbeddingRequest {
    /// Validates that at least one section is present and non-empty
    pub fn from_payload(body: &Map<String, Value>) -> Result<Self, ApiError> {
        let request = Self {
            abstract_text: supplied_text(body, "abstract").map(str::to_string),
            conclusion: supplied_text(body, "conclusion").map(str::to_string),
        };

        if request.abstract_text.is_none() && request.conclusion.is_none() {
            return Err(ApiError::MissingPaperSections);
        }

        Ok(request)
    }

    /// Supplied sections as `(name, text)`, abstract first
    pub fn sections(&self) -> Vec<(&'static str, String)> {
        PAPER_SECTIONS
            .iter()
            .zip([&self.abstract_text, &self.conclusion])
            .filter_map(|(name, text)| text.clone().map(|t| (*name, t)))
            .collect()
    }
}
