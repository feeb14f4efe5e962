// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs a sentence-transformer model (all-MiniLM-L6-v2 by default) through
//! ONNX Runtime.
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - BERT tokenization with truncation and batch padding
//! - Attention-masked mean pooling over token embeddings
//! - Optional L2 normalization
//! - Output dimension discovered from the model at load time

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use super::{l2_normalize, TextEncoder};

/// Load-time options for [`OnnxEmbeddingModel`]
#[derive(Debug, Clone)]
pub struct OnnxModelOptions {
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
    /// Tokenizer truncation length (256 for all-MiniLM-L6-v2)
    pub max_length: usize,
    /// L2-normalize pooled vectors
    pub normalize: bool,
}

impl Default for OnnxModelOptions {
    fn default() -> Self {
        Self {
            intra_threads: 4,
            max_length: 256,
            normalize: true,
        }
    }
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// `Session::run` needs exclusive access, so the session sits behind a
/// mutex. Inference runs on the blocking thread pool; concurrent requests
/// queue on the lock while tokenization stays parallel.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
    max_length: usize,
    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The model does not output token embeddings `[batch, seq_len, hidden]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "all-MiniLM-L6-v2",
    ///     "/models/all-MiniLM-L6-v2/onnx/model.onnx",
    ///     "/models/all-MiniLM-L6-v2/tokenizer.json",
    ///     OnnxModelOptions::default(),
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        options: OnnxModelOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref().to_path_buf();
        let tokenizer_path = tokenizer_path.as_ref().to_path_buf();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }
        if options.max_length == 0 {
            anyhow::bail!("max_length must be greater than 0");
        }

        let intra_threads = options.intra_threads.max(1);
        let max_length = options.max_length;

        // Session creation and the validation run are CPU bound
        let (session, tokenizer, dimension) = tokio::task::spawn_blocking(move || {
            let mut session = build_session(&model_path, intra_threads)?;

            let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
            tokenizer
                .with_truncation(Some(TruncationParams {
                    max_length,
                    ..Default::default()
                }))
                .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;

            let dimension = probe_dimension(&mut session, &tokenizer)?;
            Ok::<_, anyhow::Error>((session, tokenizer, dimension))
        })
        .await
        .context("Model loading task failed")??;

        info!(
            "✅ ONNX embedding model '{}' loaded ({} dimensions)",
            model_name, dimension
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            max_length,
            normalize: options.normalize,
        })
    }

}

#[async_trait]
impl TextEncoder for OnnxEmbeddingModel {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No embedding generated"))
    }

    /// Tokenizes all texts, pads to the longest sequence and runs one
    /// inference for the whole batch, all on the blocking pool.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let texts = texts.to_vec();
        let tokenizer = Arc::clone(&self.tokenizer);
        let session = Arc::clone(&self.session);
        let normalize = self.normalize;
        let expected = self.dimension;

        debug!("Running ONNX inference for {} texts", texts.len());

        let embeddings = tokio::task::spawn_blocking(move || {
            let encodings = tokenize(&tokenizer, &texts)?;
            let mut session = session
                .lock()
                .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
            run_batch(&mut session, &encodings, normalize)
        })
        .await
        .context("Inference task failed")??;

        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != expected {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    embedding.len(),
                    expected
                );
            }
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn tokenize(tokenizer: &Tokenizer, texts: &[String]) -> Result<Vec<Encoding>> {
    texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow!("Tokenization failed: {}", e))
        })
        .collect()
}

/// Builds a session on CUDA, falling back to CPU when CUDA is unavailable
fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    info!("   Attempting CUDA execution provider...");
    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(session) => {
            info!("✅ CUDA execution provider initialized");
            Ok(session)
        }
        Err(e) => {
            warn!("⚠️  CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(intra_threads)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| {
                    format!("Failed to load ONNX model from {}", model_path.display())
                })
        }
    }
}

/// Runs one inference and reads the hidden size off the output shape
fn probe_dimension(session: &mut Session, tokenizer: &Tokenizer) -> Result<usize> {
    let encoding = tokenizer
        .encode("validation test", true)
        .map_err(|e| anyhow!("Tokenizer validation failed: {}", e))?;

    let embeddings = run_batch(session, &[encoding], false)?;
    let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
    if dimension == 0 {
        anyhow::bail!("Model produced an empty embedding during validation");
    }

    Ok(dimension)
}

/// Pads encodings to a common length, runs the session and mean-pools the
/// token embeddings of each item.
fn run_batch(session: &mut Session, encodings: &[Encoding], normalize: bool) -> Result<Vec<Vec<f32>>> {
    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut input_ids = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask = Vec::with_capacity(batch_size * max_len);

    for encoding in encodings {
        let ids = encoding.get_ids();
        let padding = max_len - ids.len();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        input_ids.extend(std::iter::repeat(0i64).take(padding));

        attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
    }

    let token_type_ids = vec![0i64; batch_size * max_len];

    let input_ids_array = Array2::from_shape_vec((batch_size, max_len), input_ids)
        .context("Failed to create input_ids array")?;
    let attention_mask_array = Array2::from_shape_vec((batch_size, max_len), attention_mask.clone())
        .context("Failed to create attention_mask array")?;
    let token_type_ids_array = Array2::from_shape_vec((batch_size, max_len), token_type_ids)
        .context("Failed to create token_type_ids array")?;

    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(input_ids_array)?,
        "attention_mask" => Value::from_array(attention_mask_array)?,
        "token_type_ids" => Value::from_array(token_type_ids_array)?
    ])?;

    // Index [0] rather than a name: exports differ in output naming
    let output_array = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;

    let shape = output_array.shape();
    if shape.len() != 3 || shape[0] != batch_size {
        anyhow::bail!(
            "Model outputs unexpected dimensions: {:?} (expected [{}, seq_len, hidden])",
            shape,
            batch_size
        );
    }

    let mut embeddings = Vec::with_capacity(batch_size);
    for batch_idx in 0..batch_size {
        let item = output_array.index_axis(Axis(0), batch_idx);
        let mask = &attention_mask[batch_idx * max_len..(batch_idx + 1) * max_len];

        let seq_len = item.shape()[0].min(max_len);
        let hidden_dim = item.shape()[1];

        let mut pooled = vec![0.0f32; hidden_dim];
        let mut sum_mask = 0.0f32;

        for i in 0..seq_len {
            let mask_value = mask[i] as f32;
            if mask_value == 0.0 {
                continue;
            }
            sum_mask += mask_value;
            for (j, slot) in pooled.iter_mut().enumerate() {
                *slot += item[[i, j]] * mask_value;
            }
        }

        for value in &mut pooled {
            *value /= sum_mask.max(1e-9);
        }

        if normalize {
            l2_normalize(&mut pooled);
        }

        embeddings.push(pooled);
    }

    Ok(embeddings)
}
