// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! JSON body extractor
//!
//! axum's `Json` extractor rejects bad bodies with its own status codes and
//! plain-text messages. Every POST endpoint here instead answers
//! `400 {"error": "No data provided"}` for an absent, unparsable or empty
//! body, before any field validation runs. The content type is not checked.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};
use tracing::debug;

use super::ApiError;

/// A request body that parsed to a non-empty JSON object
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Map<String, Value>);

impl JsonPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ApiError> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) if !map.is_empty() => Ok(Self(map)),
            Ok(other) => {
                debug!("Rejecting non-object or empty JSON body: {}", other);
                Err(ApiError::NoData)
            }
            Err(e) => {
                debug!("Rejecting unparsable body: {}", e);
                Err(ApiError::NoData)
            }
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BodyRejected {
                status: rejection.status().as_u16(),
                message: rejection.body_text(),
            })?;

        Self::from_slice(&bytes)
    }
}
