// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every option can be given as a command-line flag or through the
//! environment (a `.env` file is loaded by `main` before parsing).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::api::similarity::DEFAULT_MAX_TOP_K;
use crate::DEFAULT_MODEL_NAME;

/// Environment name that turns debug mode on
pub const DEVELOPMENT_ENV: &str = "development";

/// Which encoder implementation serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncoderBackend {
    /// ONNX Runtime sentence transformer
    Onnx,
    /// Deterministic hash-seeded vectors, no model files needed
    Hash,
}

/// Embedding gateway configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "embedding-gateway")]
#[command(version)]
#[command(about = "HTTP gateway serving sentence embeddings", long_about = None)]
pub struct ServiceConfig {
    /// Model identifier (HuggingFace repo, bare names resolve to sentence-transformers/<name>)
    #[arg(long, env = "BERT_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Local directory holding model.onnx and tokenizer.json
    #[arg(long, env = "EMBEDDING_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Encoder backend
    #[arg(long, env = "EMBEDDING_BACKEND", value_enum, default_value_t = EncoderBackend::Onnx)]
    pub backend: EncoderBackend,

    /// Output dimension of the hash backend
    #[arg(long, env = "EMBEDDING_HASH_DIMENSION", default_value_t = 384)]
    pub hash_dimension: usize,

    /// ONNX Runtime intra-op thread count
    #[arg(long, env = "EMBEDDING_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Tokenizer truncation length
    #[arg(long, env = "EMBEDDING_MAX_LENGTH", default_value_t = 256)]
    pub max_length: usize,

    /// Return raw mean-pooled vectors instead of L2-normalized ones
    #[arg(long, env = "EMBEDDING_NO_NORMALIZE")]
    pub no_normalize: bool,

    /// Bind address
    #[arg(long, env = "EMBEDDING_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listening port
    #[arg(long, env = "EMBEDDING_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Deployment environment ("development" enables debug mode)
    #[arg(long, env = "EMBEDDING_ENV", default_value = "production")]
    pub environment: String,

    /// JSON paper index; when set, similarity uses real vector search
    #[arg(long, env = "PAPER_INDEX_PATH")]
    pub paper_index: Option<PathBuf>,

    /// Ceiling applied to the requested top_k
    #[arg(long, env = "MAX_TOP_K", default_value_t = DEFAULT_MAX_TOP_K)]
    pub max_top_k: usize,
}

impl ServiceConfig {
    /// Debug mode: verbose logging and per-request tracing
    pub fn debug(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEVELOPMENT_ENV)
    }

    pub fn normalize(&self) -> bool {
        !self.no_normalize
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    /// Default `RUST_LOG` filter when none is set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug() {
            "debug"
        } else {
            "info"
        }
    }
}
