//! File storage

use crate::error::Result;
use crate::http::{Form, RequestOptions, Transport};
use crate::types::{FileDeleted, FileList, FileObject, FileUploadRequest};
use reqwest::Response;
use std::sync::Arc;

/// File storage operations
#[derive(Debug, Clone)]
pub struct Files {
    transport: Arc<Transport>,
}

impl Files {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Upload a file.
    pub async fn create(
        &self,
        request: &FileUploadRequest,
        opts: RequestOptions,
    ) -> Result<FileObject> {
        let form = Form::new()
            .file("file", &request.filename, request.content.clone())
            .text("purpose", &request.purpose);
        self.transport.post_form("/v1/files", &form, &opts).await
    }

    /// List stored files.
    pub async fn list(&self, opts: RequestOptions) -> Result<FileList> {
        self.transport.get("/v1/files", &opts).await
    }

    /// Retrieve a file's metadata.
    pub async fn retrieve(&self, file_id: &str, opts: RequestOptions) -> Result<FileObject> {
        self.transport
            .get(&format!("/v1/files/{file_id}"), &opts)
            .await
    }

    /// Delete a file.
    pub async fn delete(&self, file_id: &str, opts: RequestOptions) -> Result<FileDeleted> {
        self.transport
            .delete(&format!("/v1/files/{file_id}"), &opts)
            .await
    }

    /// Download a file's raw content.
    ///
    /// Returns the live response; read the body with `bytes()` or
    /// `bytes_stream()`.
    pub async fn content(&self, file_id: &str, opts: RequestOptions) -> Result<Response> {
        self.transport
            .get_stream(&format!("/v1/files/{file_id}/content"), &opts)
            .await
    }
}
