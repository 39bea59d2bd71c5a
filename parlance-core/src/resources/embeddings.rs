//! Embeddings

use crate::error::Result;
use crate::http::{RequestOptions, Transport};
use crate::types::{EmbeddingRequest, EmbeddingResponse};
use std::sync::Arc;

/// Embedding operations
#[derive(Debug, Clone)]
pub struct Embeddings {
    transport: Arc<Transport>,
}

impl Embeddings {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Compute embeddings for the given input.
    pub async fn create(
        &self,
        request: &EmbeddingRequest,
        opts: RequestOptions,
    ) -> Result<EmbeddingResponse> {
        self.transport
            .post("/v1/embeddings", Some(request), &opts)
            .await
    }
}
