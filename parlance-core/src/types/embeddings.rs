//! Embedding request and response types

use crate::optional::Optional;
use crate::types::shared::CompletionUsage;
use serde::{Deserialize, Serialize};

/// Embedding input: one text or a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Text(String),
    Batch(Vec<String>),
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        EmbeddingInput::Text(text.to_string())
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(batch: Vec<String>) -> Self {
        EmbeddingInput::Batch(batch)
    }
}

/// Request body for `POST /v1/embeddings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub input: EmbeddingInput,
    pub model: String,
    /// "float" or "base64"
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub encoding_format: Optional<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: impl Into<EmbeddingInput>) -> Self {
        Self {
            input: input.into(),
            model: model.into(),
            encoding_format: Optional::Absent,
            user: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub index: u32,
    pub embedding: Vec<f64>,
    pub object: String,
}

/// Response body for an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,
    pub data: Vec<Embedding>,
    pub model: String,
    pub usage: CompletionUsage,
}
