//! Typed streaming over Server-Sent Events
//!
//! [`EventStream`] wraps a live streaming response and yields deserialized
//! payloads one at a time. The `"[DONE]"` sentinel sent by the service is
//! translated into ordinary end-of-stream, so callers only ever see their
//! payload type or an error.

use crate::error::Error;
use crate::sse::{Decoder, Event};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Sentinel payload marking the end of a stream.
const DONE_SENTINEL: &str = "[DONE]";

/// A pull-based stream of typed events decoded from an SSE response
///
/// `next` returns `None` once the stream is finished, whether by the done
/// sentinel, natural end of input, or a terminal error already delivered.
/// Cancellation surfaces as [`Error::Cancelled`] and does not tear the
/// stream down by itself; dropping or closing the stream does.
pub struct EventStream<T> {
    rx: Option<mpsc::Receiver<Result<Event, Error>>>,
    cancel: CancellationToken,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("open", &self.rx.is_some())
            .field("done", &self.done)
            .finish()
    }
}

impl<T: DeserializeOwned> EventStream<T> {
    pub(crate) fn new(response: Response, cancel: CancellationToken) -> Self {
        let rx = Decoder::new().decode(response.bytes_stream());
        Self {
            rx: Some(rx),
            cancel,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Pull the next event.
    ///
    /// Returns `None` at end of stream. A decode failure on a payload is
    /// terminal: the error is returned once and subsequent calls return
    /// `None`.
    pub async fn next(&mut self) -> Option<Result<T, Error>> {
        if self.done {
            return None;
        }
        let rx = self.rx.as_mut()?;

        let received = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Some(Err(Error::Cancelled)),
            received = rx.recv() => received,
        };

        let event = match received {
            None => {
                self.done = true;
                return None;
            }
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            Some(Ok(event)) => event,
        };

        if event.data.starts_with(DONE_SENTINEL) {
            self.done = true;
            return None;
        }

        match serde_json::from_str(&event.data) {
            Ok(payload) => Some(Ok(payload)),
            Err(e) => {
                self.done = true;
                Some(Err(Error::Decode(format!(
                    "failed to decode stream event: {e}"
                ))))
            }
        }
    }

    /// Release the stream and its underlying connection.
    ///
    /// Safe to call more than once; after the first call `next` returns
    /// `None`.
    pub fn close(&mut self) {
        self.rx = None;
        self.done = true;
    }
}
