//! Transport core
//!
//! Translates logical calls (`post`, `get`, `delete`, `post_stream`,
//! `get_stream`, `post_form`) into concrete HTTP semantics: URL and header
//! construction, option merging, retry orchestration, response
//! classification and decoding.

use crate::config::{
    ClientConfig, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_IDLE_PER_HOST, USER_AGENT,
};
use crate::error::{map_transport_error, ApiError, Error, Result};
use crate::http::{form::Form, query, retry, RequestOptions};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_EVENT_STREAM: &str = "text/event-stream";

/// Expected response body shape, checked under strict validation
#[derive(Debug, Clone, Copy)]
enum Expected {
    Json,
    Stream,
}

impl Expected {
    fn matches(self, content_type: &str) -> bool {
        match self {
            Expected::Json => content_type.starts_with(CONTENT_TYPE_JSON),
            Expected::Stream => {
                content_type.starts_with(CONTENT_TYPE_EVENT_STREAM)
                    || content_type.starts_with(CONTENT_TYPE_JSON)
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Expected::Json => CONTENT_TYPE_JSON,
            Expected::Stream => "text/event-stream or application/json",
        }
    }
}

/// Shared HTTP transport with connection pooling
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl Transport {
    pub(crate) fn new(config: Arc<ClientConfig>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(DEFAULT_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(DEFAULT_IDLE_TIMEOUT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: Option<&B>, opts: &RequestOptions) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode_body(body, opts)?;
        let response = self.execute(Method::POST, path, body, opts).await?;
        self.decode_json(response, opts).await
    }

    /// Send a GET request and decode the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str, opts: &RequestOptions) -> Result<R> {
        let response = self.execute(Method::GET, path, None, opts).await?;
        self.decode_json(response, opts).await
    }

    /// Send a DELETE request and decode the JSON response.
    pub async fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<R> {
        let response = self.execute(Method::DELETE, path, None, opts).await?;
        self.decode_json(response, opts).await
    }

    /// Send a POST request and return the live response for streaming.
    ///
    /// Error classification and strict validation still apply; on an error
    /// path the body is consumed here so the caller never receives a leaked
    /// open response. On success the caller owns the response and its body.
    pub async fn post_stream<B>(
        &self,
        path: &str,
        body: Option<&B>,
        opts: &RequestOptions,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode_body(body, opts)?;
        let response = self.execute(Method::POST, path, body, opts).await?;
        self.check_response(response, Expected::Stream, opts).await
    }

    /// Send a GET request and return the live response.
    pub async fn get_stream(&self, path: &str, opts: &RequestOptions) -> Result<Response> {
        let response = self.execute(Method::GET, path, None, opts).await?;
        self.check_response(response, Expected::Stream, opts).await
    }

    /// Send a POST request with a multipart/form-data body.
    pub async fn post_form<R: DeserializeOwned>(
        &self,
        path: &str,
        form: &Form,
        opts: &RequestOptions,
    ) -> Result<R> {
        let (content_type, bytes) = form.encode();
        let response = self
            .execute(Method::POST, path, Some((content_type, bytes)), opts)
            .await?;
        self.decode_json(response, opts).await
    }

    fn encode_body<B: Serialize + ?Sized>(
        &self,
        body: Option<&B>,
        opts: &RequestOptions,
    ) -> Result<Option<(String, Bytes)>> {
        match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body).map_err(|e| {
                    Error::Decode(format!(
                        "failed to serialize request body: {e} [request_id: {}]",
                        opts.request_id
                    ))
                })?;
                Ok(Some((CONTENT_TYPE_JSON.to_string(), Bytes::from(bytes))))
            }
            None => Ok(None),
        }
    }

    /// Execute a request through the retry engine.
    ///
    /// The body is pre-serialized to `Bytes` so every attempt sends an
    /// identical request.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<(String, Bytes)>,
        opts: &RequestOptions,
    ) -> Result<Response> {
        let url = self.build_url(path, opts);
        let headers = self.build_headers(body.as_ref().map(|(ct, _)| ct.as_str()), opts);
        let max_retries = opts.max_retries.unwrap_or(self.config.max_retries);
        let request_id = opts.request_id;

        debug!(%method, url = %url, %request_id, "executing request");

        let response = retry::run(max_retries, &opts.cancel, || {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .headers(headers.clone());
            if let Some(timeout) = opts.timeout {
                request = request.timeout(timeout);
            }
            if let Some((_, bytes)) = &body {
                request = request.body(bytes.clone());
            }
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| map_transport_error(e, request_id))
            }
        })
        .await?;

        debug!(status = response.status().as_u16(), %request_id, "response received");
        Ok(response)
    }

    /// Join the base URL and path, then append merged query parameters.
    fn build_url(&self, path: &str, opts: &RequestOptions) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = format!("{base}/{path}");

        let mut merged = self.config.query_params.clone();
        for (key, value) in &opts.query {
            merged.insert(key.clone(), value.clone());
        }

        let qs = query::stringify(&merged);
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    /// Assemble headers: defaults, then platform diagnostics, then client
    /// custom headers, then request overrides (later wins), then the
    /// idempotency key.
    fn build_headers(&self, content_type: Option<&str>, opts: &RequestOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));
        set_header(
            &mut headers,
            CONTENT_TYPE.as_str(),
            content_type.unwrap_or(CONTENT_TYPE_JSON),
        );
        set_header(
            &mut headers,
            "authorization",
            &format!("Bearer {}", self.config.api_key),
        );

        headers.insert("x-client-lang", HeaderValue::from_static("rust"));
        set_header(
            &mut headers,
            "x-client-package-version",
            env!("CARGO_PKG_VERSION"),
        );
        headers.insert(
            "x-client-os",
            HeaderValue::from_static(std::env::consts::OS),
        );
        headers.insert(
            "x-client-arch",
            HeaderValue::from_static(std::env::consts::ARCH),
        );
        headers.insert("x-client-runtime", HeaderValue::from_static("tokio"));
        set_header(&mut headers, "x-request-id", &opts.request_id.to_string());

        for (key, value) in &self.config.headers {
            set_header(&mut headers, key, value);
        }
        for (key, value) in &opts.headers {
            set_header(&mut headers, key, value);
        }
        if let Some(key) = &opts.idempotency_key {
            set_header(&mut headers, "idempotency-key", key);
        }

        headers
    }

    /// Classify a response: ≥400 becomes an [`ApiError`] (body parsed
    /// best-effort), <400 passes strict content-type validation when
    /// enabled (204 No Content exempt).
    async fn check_response(
        &self,
        response: Response,
        expected: Expected,
        opts: &RequestOptions,
    ) -> Result<Response> {
        let status = response.status();

        if status.as_u16() >= 400 {
            // Best-effort body read; edge proxies do not always send JSON.
            let bytes = response.bytes().await.unwrap_or_default();
            let api_error = ApiError::new(status.as_u16(), &bytes, opts.request_id);
            if api_error.body.is_none() && !bytes.is_empty() {
                warn!(
                    status = status.as_u16(),
                    request_id = %opts.request_id,
                    "error response body is not valid JSON"
                );
            }
            return Err(Error::Api(api_error));
        }

        if self.config.strict_validation && status != StatusCode::NO_CONTENT {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            if !expected.matches(&content_type) {
                // Dropping the response here releases the body.
                return Err(Error::Validation(format!(
                    "expected Content-Type {}, got {:?} [request_id: {}]",
                    expected.describe(),
                    content_type,
                    opts.request_id
                )));
            }
        }

        Ok(response)
    }

    async fn decode_json<R: DeserializeOwned>(
        &self,
        response: Response,
        opts: &RequestOptions,
    ) -> Result<R> {
        let response = self.check_response(response, Expected::Json, opts).await?;
        let bytes = response.bytes().await.map_err(|e| {
            Error::Connection(format!(
                "failed to read response body: {e} [request_id: {}]",
                opts.request_id
            ))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::Decode(format!("{e} [request_id: {}]", opts.request_id))
        })
    }
}

/// Insert a header, skipping (with a log line) names or values that are
/// not representable on the wire.
fn set_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!(header = name, "skipping invalid header"),
    }
}
