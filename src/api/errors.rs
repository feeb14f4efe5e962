// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by the HTTP handlers
///
/// Validation failures map to 400 and internal failures to 500. Every
/// response body carries an `error` message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Body absent, not JSON, or not a non-empty JSON object
    #[error("No data provided")]
    NoData,

    #[error("Missing required fields")]
    MissingFields(Vec<String>),

    #[error("At least one of abstract or conclusion must be provided")]
    MissingPaperSections,

    #[error("No embeddings provided")]
    NoEmbeddings,

    #[error("Invalid embeddings: {0}")]
    InvalidEmbeddings(String),

    #[error("Invalid top_k: {0}")]
    InvalidTopK(String),

    /// Body refused by the transport (e.g. over the size limit)
    #[error("{message}")]
    BodyRejected { status: u16, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoData
            | ApiError::MissingFields(_)
            | ApiError::MissingPaperSections
            | ApiError::NoEmbeddings
            | ApiError::InvalidEmbeddings(_)
            | ApiError::InvalidTopK(_) => StatusCode::BAD_REQUEST,
            ApiError::BodyRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status_code().is_client_error()
    }

    pub fn body(&self) -> Value {
        match self {
            ApiError::MissingFields(fields) => json!({
                "error": self.to_string(),
                "missing_fields": fields,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
