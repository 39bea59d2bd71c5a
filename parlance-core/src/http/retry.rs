//! Retry engine with header-driven policy and exponential backoff
//!
//! Only HTTP-response-level conditions are retried: a transport failure
//! (no response obtained) propagates immediately. The final response is
//! returned as-is after the budget is exhausted; classification of a
//! still-failing status is the transport's job, not the engine's.

use crate::error::{Error, Result};
use rand::Rng;
use reqwest::header::HeaderMap;
use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Initial backoff delay
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Maximum backoff delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Decide whether a response warrants a retry.
///
/// An explicit `x-should-retry: true|false` header overrides everything
/// else; otherwise 408 (timeout), 409 (conflict), 429 (rate limit) and any
/// 5xx retry.
pub fn should_retry(response: &Response) -> bool {
    if let Some(hint) = response
        .headers()
        .get("x-should-retry")
        .and_then(|v| v.to_str().ok())
    {
        return hint == "true";
    }

    match response.status().as_u16() {
        408 | 409 | 429 => true,
        status => status >= 500,
    }
}

/// Compute the delay before the next attempt.
///
/// Priority: `Retry-After` integer seconds in (0, 60], then
/// `retry-after-ms` positive integer milliseconds, then exponential
/// backoff capped at [`MAX_RETRY_DELAY`] with a jitter factor drawn
/// uniformly from [0.75, 1.0].
pub fn backoff_delay(attempt: u32, headers: &HeaderMap) -> Duration {
    if let Some(seconds) = header_int(headers, "retry-after") {
        if seconds > 0 && seconds <= 60 {
            return Duration::from_secs(seconds as u64);
        }
    }

    if let Some(ms) = header_int(headers, "retry-after-ms") {
        if ms > 0 {
            return Duration::from_millis(ms as u64);
        }
    }

    let base = INITIAL_RETRY_DELAY.as_millis() as f64 * 2f64.powi(attempt as i32);
    let capped = base.min(MAX_RETRY_DELAY.as_millis() as f64);
    let jitter = 1.0 - 0.25 * rand::thread_rng().gen::<f64>();
    Duration::from_millis((capped * jitter) as u64)
}

fn header_int(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Run an attempt function under the retry budget.
///
/// Invokes `attempt` at most `max_retries + 1` times. Cancellation is
/// checked with priority before each attempt and during each backoff
/// sleep; it aborts with [`Error::Cancelled`] rather than a partial
/// result.
pub async fn run<F, Fut>(
    max_retries: u32,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response>>,
{
    for attempt_index in 0..=max_retries {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = attempt() => result?,
        };

        if !should_retry(&response) || attempt_index == max_retries {
            return Ok(response);
        }

        let delay = backoff_delay(attempt_index, response.headers());
        tracing::debug!(
            status = response.status().as_u16(),
            attempt = attempt_index + 1,
            delay_ms = delay.as_millis() as u64,
            "retrying request after backoff"
        );
        drop(response);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }

    unreachable!("retry loop always returns within the budget")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(entries: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(
                reqwest::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn retry_after_seconds_is_used_directly() {
        let delay = backoff_delay(0, &headers(&[("retry-after", "10")]));
        assert_eq!(delay, Duration::from_secs(10));
        // Attempt index is irrelevant when the server supplies a hint.
        let delay = backoff_delay(5, &headers(&[("retry-after", "10")]));
        assert_eq!(delay, Duration::from_secs(10));
    }

    #[test]
    fn retry_after_outside_window_falls_back_to_exponential() {
        let delay = backoff_delay(0, &headers(&[("retry-after", "61")]));
        assert!(delay <= INITIAL_RETRY_DELAY);
        let delay = backoff_delay(0, &headers(&[("retry-after", "0")]));
        assert!(delay <= INITIAL_RETRY_DELAY);
    }

    #[test]
    fn retry_after_ms_is_used_directly() {
        let delay = backoff_delay(3, &headers(&[("retry-after-ms", "250")]));
        assert_eq!(delay, Duration::from_millis(250));
    }

    #[test]
    fn retry_after_seconds_wins_over_milliseconds() {
        let delay = backoff_delay(
            0,
            &headers(&[("retry-after", "2"), ("retry-after-ms", "50")]),
        );
        assert_eq!(delay, Duration::from_secs(2));
    }

    #[test]
    fn unparseable_hints_fall_back_to_exponential() {
        let delay = backoff_delay(0, &headers(&[("retry-after", "soon")]));
        assert!(delay <= INITIAL_RETRY_DELAY);
        assert!(delay >= Duration::from_millis((500.0 * 0.75) as u64));
    }

    #[test]
    fn exponential_backoff_is_bounded_and_capped() {
        let empty = HeaderMap::new();
        for attempt in 0..10 {
            let expected = (INITIAL_RETRY_DELAY.as_millis() as f64 * 2f64.powi(attempt))
                .min(MAX_RETRY_DELAY.as_millis() as f64);
            let delay = backoff_delay(attempt as u32, &empty);
            // Jitter only ever reduces the delay, by at most 25%.
            assert!(delay.as_millis() as f64 <= expected);
            assert!(delay.as_millis() as f64 >= expected * 0.75 - 1.0);
            assert!(delay <= MAX_RETRY_DELAY);
        }
    }

    #[test]
    fn backoff_upper_bound_is_monotonic() {
        // With jitter stripped, delays double until the cap.
        let empty = HeaderMap::new();
        let mut last_max = 0f64;
        for attempt in 0..8 {
            let delay = backoff_delay(attempt, &empty);
            let upper = (delay.as_millis() as f64) / 0.75;
            assert!(upper >= last_max * 0.99);
            last_max = last_max.max(delay.as_millis() as f64);
        }
    }
}
