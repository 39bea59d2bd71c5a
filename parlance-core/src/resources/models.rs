//! Model catalog

use crate::error::Result;
use crate::http::{RequestOptions, Transport};
use crate::types::{Model, ModelDeleted, ModelList};
use std::sync::Arc;

/// Model catalog operations
#[derive(Debug, Clone)]
pub struct Models {
    transport: Arc<Transport>,
}

impl Models {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List available models.
    pub async fn list(&self, opts: RequestOptions) -> Result<ModelList> {
        self.transport.get("/v1/models", &opts).await
    }

    /// Retrieve one model by id.
    pub async fn retrieve(&self, model_id: &str, opts: RequestOptions) -> Result<Model> {
        self.transport
            .get(&format!("/v1/models/{model_id}"), &opts)
            .await
    }

    /// Delete a fine-tuned model.
    pub async fn delete(&self, model_id: &str, opts: RequestOptions) -> Result<ModelDeleted> {
        self.transport
            .delete(&format!("/v1/models/{model_id}"), &opts)
            .await
    }
}
