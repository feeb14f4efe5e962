// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model loading
//!
//! Locates the ONNX model and tokenizer for the configured model identifier,
//! either in a local directory or on the HuggingFace hub, and builds the
//! process-wide encoder.

use anyhow::{Context, Result};
use hf_hub::api::tokio::Api;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::onnx_model::{OnnxEmbeddingModel, OnnxModelOptions};
use super::{HashEncoder, TextEncoder};
use crate::config::{EncoderBackend, ServiceConfig};

/// Organisation that bare sentence-transformer names belong to
pub const SENTENCE_TRANSFORMERS_ORG: &str = "sentence-transformers";

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE_CANDIDATES: [&str; 2] = ["onnx/model.onnx", "model.onnx"];

/// On-disk locations of a model's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Maps a model identifier to its hub repository
///
/// `all-MiniLM-L6-v2` becomes `sentence-transformers/all-MiniLM-L6-v2`;
/// identifiers that already name an organisation are kept as is.
pub fn hub_repo_id(model_name: &str) -> String {
    if model_name.contains('/') {
        model_name.to_string()
    } else {
        format!("{}/{}", SENTENCE_TRANSFORMERS_ORG, model_name)
    }
}

/// Finds model files in a local directory
pub fn find_local_files(dir: &Path) -> Result<ModelFiles> {
    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if !tokenizer_path.exists() {
        anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
    }

    let model_path = MODEL_FILE_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.exists())
        .with_context(|| format!("No ONNX model found in {}", dir.display()))?;

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}

/// Downloads (or reuses the hub cache for) a model's files
async fn download_files(model_name: &str) -> Result<ModelFiles> {
    let repo_id = hub_repo_id(model_name);
    info!("Fetching model files for {} from the HuggingFace hub", repo_id);

    let api = Api::new().context("Failed to initialize HuggingFace hub client")?;
    let repo = api.model(repo_id.clone());

    let tokenizer_path = repo
        .get(TOKENIZER_FILE)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", TOKENIZER_FILE, repo_id))?;

    let mut last_error = None;
    for candidate in MODEL_FILE_CANDIDATES {
        match repo.get(candidate).await {
            Ok(model_path) => {
                return Ok(ModelFiles {
                    model_path,
                    tokenizer_path,
                })
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "No ONNX export found in {}: {}",
        repo_id,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Resolves model files from `--model-dir`, or the hub when no directory is set
pub async fn resolve_model_files(config: &ServiceConfig) -> Result<ModelFiles> {
    match &config.model_dir {
        Some(dir) => find_local_files(dir),
        None => download_files(&config.model_name).await,
    }
}

/// Builds the encoder selected by the configuration
pub async fn load_encoder(config: &ServiceConfig) -> Result<Arc<dyn TextEncoder>> {
    match config.backend {
        EncoderBackend::Hash => {
            info!(
                "Using hash encoder for '{}' ({} dimensions)",
                config.model_name, config.hash_dimension
            );
            let encoder = HashEncoder::new(config.model_name.clone(), config.hash_dimension)?
                .with_normalization(config.normalize());
            Ok(Arc::new(encoder))
        }
        EncoderBackend::Onnx => {
            info!("Loading embedding model '{}'...", config.model_name);
            let files = resolve_model_files(config).await?;
            let options = OnnxModelOptions {
                intra_threads: config.intra_threads,
                max_length: config.max_length,
                normalize: config.normalize(),
            };
            let model = OnnxEmbeddingModel::new(
                config.model_name.clone(),
                files.model_path,
                files.tokenizer_path,
                options,
            )
            .await?;
            Ok(Arc::new(model))
        }
    }
}
