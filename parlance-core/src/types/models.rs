//! Model catalog types

use serde::{Deserialize, Serialize};

/// An available model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub created: i64,
    pub object: String,
    pub owned_by: String,
}

/// Response body for `GET /v1/models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<Model>,
}

/// Response body for a model deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDeleted {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}
