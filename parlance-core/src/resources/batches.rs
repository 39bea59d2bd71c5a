//! Batch processing

use crate::error::Result;
use crate::http::{RequestOptions, Transport};
use crate::optional::Optional;
use crate::types::{Batch, BatchList, CreateBatchRequest, ListBatchesParams};
use std::sync::Arc;

/// Batch job operations
#[derive(Debug, Clone)]
pub struct Batches {
    transport: Arc<Transport>,
}

impl Batches {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Create a batch job.
    pub async fn create(
        &self,
        request: &CreateBatchRequest,
        opts: RequestOptions,
    ) -> Result<Batch> {
        self.transport
            .post("/v1/batches", Some(request), &opts)
            .await
    }

    /// Retrieve a batch job.
    pub async fn retrieve(&self, batch_id: &str, opts: RequestOptions) -> Result<Batch> {
        self.transport
            .get(&format!("/v1/batches/{batch_id}"), &opts)
            .await
    }

    /// Cancel a batch job.
    pub async fn cancel(&self, batch_id: &str, opts: RequestOptions) -> Result<Batch> {
        self.transport
            .post::<(), _>(&format!("/v1/batches/{batch_id}/cancel"), None, &opts)
            .await
    }

    /// List batch jobs, newest first, paginated by cursor.
    pub async fn list(&self, params: &ListBatchesParams, opts: RequestOptions) -> Result<BatchList> {
        let mut opts = opts;
        if let Optional::Value(after) = &params.after {
            opts = opts.with_query("after", after.as_str());
        }
        if let Optional::Value(limit) = params.limit {
            opts = opts.with_query("limit", i64::from(limit));
        }
        self.transport.get("/v1/batches", &opts).await
    }
}
