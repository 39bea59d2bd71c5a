//! Top-level client and builder

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{QueryValue, Transport};
use crate::resources::{Audio, Batches, Chat, Embeddings, Files, Models};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const API_KEY_ENV: &str = "PARLANCE_API_KEY";
const BASE_URL_ENV: &str = "PARLANCE_BASE_URL";

/// A configured API client
///
/// All resource handles share one [`Transport`], and through it one
/// connection pool. The client is cheap to clone and safe to share across
/// tasks.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<Transport>,
    /// Chat completions
    pub chat: Chat,
    /// Embeddings
    pub embeddings: Embeddings,
    /// Audio: speech, transcription, translation
    pub audio: Audio,
    /// Model catalog
    pub models: Models,
    /// Batch jobs
    pub batches: Batches,
    /// File storage
    pub files: Files,
}

impl Client {
    /// Start building a client with an explicit API key.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Build a client from `PARLANCE_API_KEY` (and optionally
    /// `PARLANCE_BASE_URL`).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut builder = ClientBuilder::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// The effective configuration, for diagnostics.
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }
}

/// Builder assembling a [`ClientConfig`] into a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                api_key: api_key.into(),
                ..Default::default()
            },
        }
    }

    /// Point the client at a different endpoint, e.g. a proxy or a test
    /// server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Default retry budget for every request.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Default per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Connection establishment timeout.
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    /// Add a header sent on every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter sent on every request.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.config.query_params.insert(key.into(), value.into());
        self
    }

    /// Reject success responses whose content type does not match the call
    /// shape.
    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.config.strict_validation = strict;
        self
    }

    pub fn build(self) -> Result<Client> {
        if self.config.api_key.is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }

        debug!(config = ?self.config, "building client");

        let transport = Arc::new(Transport::new(Arc::new(self.config))?);
        Ok(Client {
            chat: Chat::new(transport.clone()),
            embeddings: Embeddings::new(transport.clone()),
            audio: Audio::new(transport.clone()),
            models: Models::new(transport.clone()),
            batches: Batches::new(transport.clone()),
            files: Files::new(transport.clone()),
            transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_empty_api_key() {
        let result = Client::builder("").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn builder_applies_overrides() {
        let client = Client::builder("sk-test")
            .base_url("http://localhost:9999")
            .max_retries(5)
            .timeout(Duration::from_secs(10))
            .strict_validation(true)
            .header("x-team", "search")
            .build()
            .unwrap();

        let config = client.config();
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.strict_validation);
        assert_eq!(config.headers["x-team"], "search");
    }

    #[test]
    fn client_is_cloneable() {
        let client = Client::builder("sk-test").build().unwrap();
        let clone = client.clone();
        assert_eq!(clone.config().base_url, client.config().base_url);
    }
}
