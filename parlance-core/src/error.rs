//! Error types for client operations

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the transport and streaming layers
#[derive(Debug, Error)]
pub enum Error {
    /// No HTTP response could be obtained (DNS, TCP, TLS failure)
    #[error("connection error: {0}")]
    Connection(String),

    /// The request or connect attempt timed out before a response arrived
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The caller's cancellation token fired at a suspension point
    #[error("request cancelled")]
    Cancelled,

    /// Response status was below 400 but violated the content-type contract
    #[error("validation error: {0}")]
    Validation(String),

    /// A body or SSE payload could not be parsed into the expected structure
    #[error("error decoding response: {0}")]
    Decode(String),

    /// Client misconfiguration or misuse detected before any request was sent
    #[error("configuration error: {0}")]
    Config(String),

    /// The API returned a status code of 400 or above
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns the API error details when this is an [`Error::Api`].
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Status-code classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    UnprocessableEntity,
    RateLimit,
    InternalServer,
    Other,
}

impl ApiErrorKind {
    fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Authentication,
            403 => ApiErrorKind::PermissionDenied,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            422 => ApiErrorKind::UnprocessableEntity,
            429 => ApiErrorKind::RateLimit,
            s if s >= 500 => ApiErrorKind::InternalServer,
            _ => ApiErrorKind::Other,
        }
    }
}

/// An error response returned by the remote API
///
/// Carries the status code, the best-effort parsed JSON body (error bodies
/// from edge proxies are not always JSON, so parse failure keeps the raw
/// text instead of erroring), and the request id used in transport logs.
#[derive(Debug, Error)]
#[error("Error code: {status} - {body_text}")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Classification derived from the status code
    pub kind: ApiErrorKind,
    /// Parsed JSON body, when the body was valid JSON
    pub body: Option<Value>,
    /// Raw response body text
    pub body_text: String,
    /// Human-readable message extracted from the body, when present
    pub message: Option<String>,
    /// Correlation id of the originating request
    pub request_id: Uuid,
}

impl ApiError {
    pub(crate) fn new(status: u16, body_bytes: &[u8], request_id: Uuid) -> Self {
        let body_text = String::from_utf8_lossy(body_bytes).into_owned();
        let body: Option<Value> = serde_json::from_slice(body_bytes).ok();
        let message = body.as_ref().and_then(extract_message);

        Self {
            status,
            kind: ApiErrorKind::from_status(status),
            body,
            body_text,
            message,
            request_id,
        }
    }
}

/// Extract a human-readable message from common error body shapes.
///
/// Handles `{"error": {"message": "..."}}`, `{"message": "..."}` and
/// `{"error": "..."}`.
fn extract_message(body: &Value) -> Option<String> {
    if let Some(msg) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Some(msg.to_string());
    }
    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        return Some(msg.to_string());
    }
    body.get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Map a reqwest transport failure (no response obtained) to an [`Error`].
pub(crate) fn map_transport_error(err: reqwest::Error, request_id: Uuid) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("{err} [request_id: {request_id}]"))
    } else if err.is_connect() {
        Error::Connection(format!("connection failed: {err} [request_id: {request_id}]"))
    } else {
        Error::Connection(format!("{err} [request_id: {request_id}]"))
    }
}
