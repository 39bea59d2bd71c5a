//! Client configuration
//!
//! [`ClientConfig`] is assembled once by [`crate::ClientBuilder`] and shared
//! immutably (behind an `Arc`) for the client's lifetime. There is no
//! mutation path after construction.

use crate::http::query::QueryValue;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default API endpoint (OpenAI-compatible surface)
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default number of retries for failed requests
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default idle connection timeout for the pool
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Default maximum idle connections per host
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 20;

/// User agent reported on every request
pub const USER_AGENT: &str = concat!("Parlance/Rust ", env!("CARGO_PKG_VERSION"));

/// Process-wide client configuration, immutable after construction
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer token sent on every request
    pub api_key: String,
    /// Base URL the request paths are joined onto
    pub base_url: String,
    /// Default retry budget (additional attempts beyond the first)
    pub max_retries: u32,
    /// Default per-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Headers applied to every request, overridable per call
    pub headers: HashMap<String, String>,
    /// Query parameters applied to every request, overridable per call
    pub query_params: BTreeMap<String, QueryValue>,
    /// Reject success responses whose content type does not match the call shape
    pub strict_validation: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            headers: HashMap::new(),
            query_params: BTreeMap::new(),
            strict_validation: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("headers", &self.headers)
            .field("query_params", &self.query_params)
            .field("strict_validation", &self.strict_validation)
            .finish()
    }
}

/// Mask a secret, keeping only a short prefix for identification.
fn redact(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let visible = secret.chars().take(4).collect::<String>();
    format!("{visible}***")
}
