//! Audio request and response types
//!
//! Transcription and translation requests carry raw audio bytes and are
//! sent as multipart forms; speech requests are JSON and return binary
//! audio.

use crate::optional::Optional;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Response body for a transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
}

/// Response body for a translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
}

/// Request body for `POST /v1/audio/speech`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
    /// flac, mp3, mulaw, ogg, wav
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub response_format: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub sample_rate: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub speed: Optional<f64>,
}

impl SpeechRequest {
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
            response_format: Optional::Absent,
            sample_rate: Optional::Absent,
            speed: Optional::Absent,
        }
    }
}

/// Parameters for `POST /v1/audio/transcriptions` (multipart)
#[derive(Debug, Clone, Default)]
pub struct TranscriptionRequest {
    pub filename: String,
    pub content: Bytes,
    pub model: String,
    pub language: Optional<String>,
    pub prompt: Optional<String>,
    /// json, text, verbose_json
    pub response_format: Optional<String>,
    pub temperature: Optional<f64>,
}

impl TranscriptionRequest {
    pub fn new(
        model: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Parameters for `POST /v1/audio/translations` (multipart)
#[derive(Debug, Clone, Default)]
pub struct TranslationRequest {
    pub filename: String,
    pub content: Bytes,
    pub model: String,
    pub prompt: Optional<String>,
    pub response_format: Optional<String>,
    pub temperature: Optional<f64>,
}

impl TranslationRequest {
    pub fn new(
        model: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}
