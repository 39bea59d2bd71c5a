//! Parlance Core Library
//!
//! A typed async client for OpenAI-compatible chat and completion APIs:
//! chat completions (including SSE streaming), embeddings, audio, files,
//! batches, and the model catalog.
//!
//! ```no_run
//! use parlance_core::{Client, RequestOptions};
//! use parlance_core::types::{ChatCompletionRequest, Message};
//!
//! # async fn run() -> parlance_core::Result<()> {
//! let client = Client::from_env()?;
//! let request = ChatCompletionRequest::new(
//!     "gpt-4o-mini",
//!     vec![Message::user("Say hello.")],
//! );
//! let completion = client.chat.create(&request, RequestOptions::new()).await?;
//! println!("{:?}", completion.choices[0].message.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod optional;
pub mod resources;
pub mod sse;
pub mod streaming;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use http::{Form, QueryValue, RequestOptions};
pub use optional::Optional;
pub use streaming::EventStream;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
