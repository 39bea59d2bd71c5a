//! Audio: speech synthesis, transcription, translation

use crate::error::Result;
use crate::http::{Form, RequestOptions, Transport};
use crate::types::{
    SpeechRequest, Transcription, TranscriptionRequest, Translation, TranslationRequest,
};
use reqwest::Response;
use std::sync::Arc;

/// Audio operations
#[derive(Debug, Clone)]
pub struct Audio {
    transport: Arc<Transport>,
}

impl Audio {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Generate audio from text.
    ///
    /// Returns the live response carrying binary audio; read it with
    /// `bytes()` or `bytes_stream()`.
    pub async fn speech(&self, request: &SpeechRequest, opts: RequestOptions) -> Result<Response> {
        self.transport
            .post_stream("/v1/audio/speech", Some(request), &opts)
            .await
    }

    /// Transcribe audio in its source language.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        opts: RequestOptions,
    ) -> Result<Transcription> {
        let form = Form::new()
            .file("file", &request.filename, request.content.clone())
            .text("model", &request.model)
            .maybe_text("language", &request.language)
            .maybe_text("prompt", &request.prompt)
            .maybe_text("response_format", &request.response_format)
            .maybe_text("temperature", &request.temperature);
        self.transport
            .post_form("/v1/audio/transcriptions", &form, &opts)
            .await
    }

    /// Translate audio into English.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        opts: RequestOptions,
    ) -> Result<Translation> {
        let form = Form::new()
            .file("file", &request.filename, request.content.clone())
            .text("model", &request.model)
            .maybe_text("prompt", &request.prompt)
            .maybe_text("response_format", &request.response_format)
            .maybe_text("temperature", &request.temperature);
        self.transport
            .post_form("/v1/audio/translations", &form, &opts)
            .await
    }
}
