//! HTTP layer: request options, transport core, retry engine, and the
//! query/form encoders
//!
//! The transport is the single choke point between the resource wrappers
//! and the wire: it builds URLs and headers, drives the retry engine, and
//! classifies responses into results or typed errors.

pub mod client;
pub mod form;
pub mod query;
pub mod retry;

pub use client::Transport;
pub use form::Form;
pub use query::QueryValue;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Per-call configuration, merged over the client defaults at call time
///
/// Request-level values win per key. Options are ephemeral; they are never
/// persisted on the client.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Header overrides for this call
    pub headers: HashMap<String, String>,
    /// Query parameter overrides for this call
    pub query: BTreeMap<String, QueryValue>,
    /// Timeout override for this call
    pub timeout: Option<Duration>,
    /// Retry budget override for this call
    pub max_retries: Option<u32>,
    /// Idempotency key letting the server deduplicate retried writes
    pub idempotency_key: Option<String>,
    /// Cancellation signal honored at every suspension point
    pub cancel: CancellationToken,
    /// Correlation id included in logs and error context
    pub request_id: Uuid,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            query: BTreeMap::new(),
            timeout: None,
            max_retries: None,
            idempotency_key: None,
            cancel: CancellationToken::new(),
            request_id: Uuid::new_v4(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header override for this call.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter override for this call.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Override the timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry budget for this call.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set an idempotency key for safe retries of write operations.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Attach a cancellation token observed at every suspension point.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
