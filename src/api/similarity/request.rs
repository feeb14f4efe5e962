// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request validation for `POST /api/paper/similarity`

use serde_json::{Map, Value};

use crate::api::ApiError;
use crate::scoring::SectionEmbeddings;

/// Matches returned when `top_k` is omitted
pub const DEFAULT_TOP_K: usize = 5;

/// Ceiling applied to `top_k` unless configured otherwise
pub const DEFAULT_MAX_TOP_K: usize = 1000;

/// Validated similarity request
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRequest {
    pub embeddings: SectionEmbeddings,
    pub top_k: usize,
}

impl SimilarityRequest {
    /// Parses `embeddings` (required) and `top_k` (optional)
    ///
    /// `top_k` accepts an integer or an integer string; zero and negative
    /// values yield an empty match list. Larger values are capped at `max_top_k`.
    pub fn from_payload(body: &Map<String, Value>, max_top_k: usize) -> Result<Self, ApiError> {
        let embeddings = match body.get("embeddings") {
            None | Some(Value::Null) => return Err(ApiError::NoEmbeddings),
            Some(value) => parse_embeddings(value)?,
        };

        let top_k = parse_top_k(body.get("top_k"))?.min(max_top_k);

        Ok(Self { embeddings, top_k })
    }
}

fn parse_embeddings(value: &Value) -> Result<SectionEmbeddings, ApiError> {
    let sections = value
        .as_object()
        .ok_or_else(|| ApiError::InvalidEmbeddings("expected an object of section vectors".to_string()))?;

    sections
        .iter()
        .map(|(section, vector)| {
            let values = vector.as_array().ok_or_else(|| {
                ApiError::InvalidEmbeddings(format!("{} must be an array of numbers", section))
            })?;

            let parsed = values
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32))
                .collect::<Option<Vec<f32>>>()
                .ok_or_else(|| {
                    ApiError::InvalidEmbeddings(format!("{} must be an array of numbers", section))
                })?;

            // Values beyond f32 range become infinite after the cast
            if parsed.iter().any(|v| !v.is_finite()) {
                return Err(ApiError::InvalidEmbeddings(format!(
                    "{} contains values outside the f32 range",
                    section
                )));
            }

            Ok((section.clone(), parsed))
        })
        .collect()
}

fn parse_top_k(value: Option<&Value>) -> Result<usize, ApiError> {
    let requested: i64 = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_TOP_K),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .ok_or_else(|| ApiError::InvalidTopK(format!("{} is not an integer", n)))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::InvalidTopK(format!("\"{}\" is not an integer", s)))?,
        Some(other) => {
            return Err(ApiError::InvalidTopK(format!("{} is not an integer", other)));
        }
    };

    Ok(usize::try_from(requested.max(0)).unwrap_or(usize::MAX))
}
