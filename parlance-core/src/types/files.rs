//! File storage types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    pub bytes: i64,
    pub created_at: i64,
    pub filename: String,
    pub object: String,
    pub purpose: String,
}

/// Response body for `GET /v1/files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileList {
    pub object: String,
    pub data: Vec<FileObject>,
}

/// Response body for a file deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDeleted {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

/// Parameters for a file upload (multipart, not JSON)
#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub filename: String,
    pub content: Bytes,
    /// e.g. "batch"
    pub purpose: String,
}

impl FileUploadRequest {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<Bytes>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            purpose: purpose.into(),
        }
    }
}
