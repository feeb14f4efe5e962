// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! `POST /api/embeddings` and `POST /api/paper/embeddings`.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embeddings_handler, paper_embeddings_handler};
pub use request::{PaperEmbeddingRequest, SubmissionEmbeddingRequest, PAPER_SECTIONS, SUBMISSION_FIELDS};
pub use response::{EmbeddingsResponse, PaperEmbeddings, SubmissionEmbeddings};
