//! Chat completions

use crate::error::{Error, Result};
use crate::http::{RequestOptions, Transport};
use crate::optional::Optional;
use crate::streaming::EventStream;
use crate::types::{ChatCompletion, ChatCompletionChunk, ChatCompletionRequest};
use std::sync::Arc;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat completion operations
#[derive(Debug, Clone)]
pub struct Chat {
    transport: Arc<Transport>,
}

impl Chat {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Request a complete (non-streaming) chat completion.
    ///
    /// Rejects requests that explicitly set `stream: true`; use
    /// [`create_stream`](Self::create_stream) for those.
    pub async fn create(
        &self,
        request: &ChatCompletionRequest,
        opts: RequestOptions,
    ) -> Result<ChatCompletion> {
        if matches!(request.stream, Optional::Value(true)) {
            return Err(Error::Config(
                "use create_stream for streaming requests".to_string(),
            ));
        }
        self.transport
            .post(COMPLETIONS_PATH, Some(request), &opts)
            .await
    }

    /// Request a streaming chat completion.
    ///
    /// The request is sent with `stream: true` regardless of the field's
    /// incoming value. The returned stream yields one chunk per event and
    /// ends at the service's done marker.
    pub async fn create_stream(
        &self,
        request: &ChatCompletionRequest,
        opts: RequestOptions,
    ) -> Result<EventStream<ChatCompletionChunk>> {
        let mut request = request.clone();
        request.stream = Optional::Value(true);

        let response = self
            .transport
            .post_stream(COMPLETIONS_PATH, Some(&request), &opts)
            .await?;
        Ok(EventStream::new(response, opts.cancel))
    }
}
