//! Server-Sent Events decoder
//!
//! Parses a chunked byte stream into discrete events per the
//! `text/event-stream` framing rules. Input chunks arrive at arbitrary
//! boundaries, so lines are reassembled from an internal buffer before
//! field parsing.
//!
//! The decoder runs as a spawned producer task feeding a single-slot
//! channel: the producer blocks until the consumer pulls, which gives
//! back-pressure and exactly-once delivery. Dropping the receiver unwinds
//! the producer and releases the underlying body stream.

use crate::error::Error;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

/// Maximum accepted length of a single SSE line (1 MiB).
///
/// Chat completion chunks can carry large JSON payloads on one `data:`
/// line; anything beyond the cap is rejected explicitly rather than
/// silently truncated.
pub const DEFAULT_MAX_EVENT_SIZE: usize = 1024 * 1024;

/// One fully-assembled Server-Sent Event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Value of the last `event:` field in the block
    pub event: String,
    /// All `data:` lines of the block, joined with `\n`
    pub data: String,
    /// Value of the last valid `id:` field in the block
    pub id: String,
    /// Reserved; `retry:` fields are parsed but not surfaced
    pub retry: u64,
}

/// Field accumulator for the event currently being assembled
#[derive(Debug, Default)]
struct Accumulator {
    event: String,
    data: Vec<String>,
    id: String,
}

impl Accumulator {
    /// True when any field has been set since the last flush. A block with
    /// zero set fields produces no event.
    fn has_event(&self) -> bool {
        !self.event.is_empty() || !self.data.is_empty() || !self.id.is_empty()
    }

    fn flush(&mut self) -> Event {
        let event = Event {
            event: std::mem::take(&mut self.event),
            data: self.data.join("\n"),
            id: std::mem::take(&mut self.id),
            retry: 0,
        };
        self.data.clear();
        event
    }

    /// Apply one non-empty line to the accumulator.
    fn apply(&mut self, line: &str) {
        let Some(colon) = line.find(':') else {
            // No field separator, malformed line.
            return;
        };
        if colon == 0 {
            // Comment line.
            return;
        }

        let field = &line[..colon];
        let value = &line[colon + 1..];
        let value = value.strip_prefix(' ').unwrap_or(value);

        match field {
            "event" => self.event = value.to_string(),
            "data" => self.data.push(value.to_string()),
            "id" => {
                // NUL bytes in ids are dropped to prevent smuggling.
                if !value.contains('\0') {
                    self.id = value.to_string();
                }
            }
            "retry" => {
                let _ = value.parse::<u64>();
            }
            _ => {}
        }
    }
}

/// Streaming SSE decoder
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_event_size: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            max_event_size: DEFAULT_MAX_EVENT_SIZE,
        }
    }

    /// Override the per-line size cap.
    pub fn with_max_event_size(max_event_size: usize) -> Self {
        Self { max_event_size }
    }

    /// Decode a byte stream into a channel of events.
    ///
    /// The returned receiver yields events in assembly order and closes
    /// when the input ends. An I/O or framing error is delivered at most
    /// once, after which no further events are produced. A trailing
    /// partial event (input ending without a blank-line terminator) is
    /// discarded, matching the wire protocol.
    pub fn decode<S, E>(&self, stream: S) -> mpsc::Receiver<Result<Event, Error>>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let max_event_size = self.max_event_size;
        tokio::spawn(decode_loop(stream, tx, max_event_size));
        rx
    }
}

async fn decode_loop<S, E>(
    mut stream: S,
    tx: mpsc::Sender<Result<Event, Error>>,
    max_event_size: usize,
) where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let mut acc = Accumulator::default();
    let mut buf: Vec<u8> = Vec::new();

    'read: loop {
        // Watch for the consumer going away even while blocked on the
        // body, so dropping the receiver releases the connection without
        // waiting for a complete event to assemble.
        let next = tokio::select! {
            biased;
            _ = tx.closed() => return,
            next = stream.next() => next,
        };
        let Some(next) = next else {
            break 'read;
        };

        let chunk = match next {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx
                    .send(Err(Error::Connection(format!("stream read error: {e}"))))
                    .await;
                return;
            }
        };

        buf.extend_from_slice(&chunk);

        let mut start = 0;
        while let Some(rel) = buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + rel;
            let line_end = if end > start && buf[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };
            if line_end - start > max_event_size {
                let _ = tx.send(Err(oversized_line(max_event_size))).await;
                return;
            }
            let line = String::from_utf8_lossy(&buf[start..line_end]);

            if line.is_empty() {
                if acc.has_event() && tx.send(Ok(acc.flush())).await.is_err() {
                    // Consumer is gone; stop reading.
                    break 'read;
                }
            } else {
                acc.apply(&line);
            }
            start = end + 1;
        }
        buf.drain(..start);

        // Cap also applies to a partial line still waiting for its newline.
        if buf.len() > max_event_size {
            let _ = tx.send(Err(oversized_line(max_event_size))).await;
            return;
        }
    }
    // End of input: any partially-assembled event is discarded, only
    // delimiter-terminated events are ever emitted.
}

fn oversized_line(max_event_size: usize) -> Error {
    Error::Decode(format!(
        "SSE line exceeds maximum event size of {max_event_size} bytes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    async fn decode_all(chunks: Vec<&str>) -> Vec<Result<Event, Error>> {
        let stream = futures::stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, Infallible>(Bytes::copy_from_slice(c.as_bytes())))
                .collect::<Vec<_>>(),
        );
        let mut rx = Decoder::new().decode(stream);
        let mut out = Vec::new();
        while let Some(item) = rx.recv().await {
            out.push(item);
        }
        out
    }

    fn events(results: Vec<Result<Event, Error>>) -> Vec<Event> {
        results.into_iter().map(|r| r.unwrap()).collect()
    }

    #[tokio::test]
    async fn single_data_event() {
        let got = events(decode_all(vec!["data: hello\n\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "hello");
        assert_eq!(got[0].event, "");
    }

    #[tokio::test]
    async fn multi_line_data_is_joined_with_newline() {
        let got = events(decode_all(vec!["data: first\ndata: second\n\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "first\nsecond");
    }

    #[tokio::test]
    async fn chunk_boundaries_do_not_split_events() {
        let got = events(decode_all(vec!["data: he", "llo\nda", "ta: world\n", "\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "hello\nworld");
    }

    #[tokio::test]
    async fn event_type_and_id_are_captured() {
        let got = events(decode_all(vec!["event: delta\nid: 42\ndata: x\n\n"]).await);
        assert_eq!(got[0].event, "delta");
        assert_eq!(got[0].id, "42");
        assert_eq!(got[0].data, "x");
    }

    #[tokio::test]
    async fn comment_lines_contribute_nothing() {
        let got = events(decode_all(vec![": keep-alive\ndata: x\n\n: another\n\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "x");
    }

    #[tokio::test]
    async fn line_without_colon_is_ignored() {
        let got = events(decode_all(vec!["garbage line\ndata: x\n\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "x");
    }

    #[tokio::test]
    async fn blank_line_without_fields_emits_nothing() {
        let got = events(decode_all(vec!["\n\n\ndata: x\n\n\n"]).await);
        assert_eq!(got.len(), 1);
    }

    #[tokio::test]
    async fn id_with_nul_byte_is_dropped() {
        let got = events(decode_all(vec!["id: good\nid: bad\0id\ndata: x\n\n"]).await);
        assert_eq!(got[0].id, "good");
    }

    #[tokio::test]
    async fn trailing_partial_event_is_discarded() {
        let got = events(decode_all(vec!["data: complete\n\ndata: partial\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "complete");
    }

    #[tokio::test]
    async fn crlf_line_endings_are_tolerated() {
        let got = events(decode_all(vec!["data: hello\r\n\r\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "hello");
    }

    #[tokio::test]
    async fn empty_data_line_yields_empty_payload_event() {
        let got = events(decode_all(vec!["data:\n\n"]).await);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, "");
    }

    #[tokio::test]
    async fn at_most_one_leading_space_is_trimmed() {
        let got = events(decode_all(vec!["data:  two spaces\n\n"]).await);
        assert_eq!(got[0].data, " two spaces");
    }

    #[tokio::test]
    async fn retry_field_is_parsed_but_not_surfaced() {
        let got = decode_all(vec!["retry: 3000\n\n"]).await;
        // retry alone does not constitute an event.
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn accumulator_resets_between_events() {
        let got = events(decode_all(vec!["event: a\ndata: 1\n\ndata: 2\n\n"]).await);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].event, "a");
        assert_eq!(got[1].event, "");
        assert_eq!(got[1].data, "2");
    }

    #[tokio::test]
    async fn oversized_line_fails_explicitly() {
        let big = format!("data: {}\n\n", "x".repeat(256));
        let stream = futures::stream::iter(vec![Ok::<_, Infallible>(Bytes::from(big))]);
        let mut rx = Decoder::with_max_event_size(64).decode(stream);
        let first = rx.recv().await.unwrap();
        assert!(matches!(first, Err(Error::Decode(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn oversized_line_split_across_chunks_fails_explicitly() {
        // 128 bytes of one line, no newline in any chunk.
        let chunks: Vec<_> = (0..8)
            .map(|_| Ok::<_, Infallible>(Bytes::from("x".repeat(16))))
            .collect();
        let mut rx = Decoder::with_max_event_size(64).decode(futures::stream::iter(chunks));
        assert!(matches!(rx.recv().await.unwrap(), Err(Error::Decode(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropped_receiver_stops_the_producer() {
        use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
        use std::sync::Arc;

        struct Guard(Arc<AtomicBool>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let pulled = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(AtomicBool::new(false));

        // Endless keep-alive comments: no event is ever assembled, so the
        // producer must notice the dropped consumer without reaching a send.
        let stream = {
            let pulled = pulled.clone();
            futures::stream::unfold(Guard(released.clone()), move |guard| {
                let pulled = pulled.clone();
                async move {
                    tokio::task::yield_now().await;
                    pulled.fetch_add(1, Ordering::SeqCst);
                    Some((
                        Ok::<_, Infallible>(Bytes::from_static(b": ping\n")),
                        guard,
                    ))
                }
            })
        };

        let rx = Decoder::new().decode(Box::pin(stream));
        drop(rx);

        for _ in 0..100 {
            if released.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        assert!(released.load(Ordering::SeqCst));
        // The producer exited before draining the body.
        assert!(pulled.load(Ordering::SeqCst) < 10);
    }

    #[tokio::test]
    async fn io_error_is_terminal_and_delivered_once() {
        let stream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"data: x\n\n")),
            Err("connection reset"),
            Ok(Bytes::from_static(b"data: never\n\n")),
        ]);
        let mut rx = Decoder::new().decode(stream);
        assert_eq!(rx.recv().await.unwrap().unwrap().data, "x");
        assert!(matches!(
            rx.recv().await.unwrap(),
            Err(Error::Connection(_))
        ));
        assert!(rx.recv().await.is_none());
    }
}
