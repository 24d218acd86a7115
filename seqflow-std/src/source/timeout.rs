//! Timeout Source - Time-capped fetch wrapper.
//!
//! **Note**: This module uses `tokio::time` and must run inside a tokio
//! runtime with the time driver enabled.

use seqflow_core::{FetchError, RequestId, Source};
use std::{future::Future, time::Duration};

/// Await `fetch`, failing with [`FetchError::Timeout`] once `cap` elapses.
///
/// With no cap the fetch is awaited as-is. A fetch that resolves on the same
/// tick as its cap counts as resolved.
pub async fn capped<T, F>(cap: Option<Duration>, fetch: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    let Some(cap) = cap else {
        return fetch.await;
    };
    match tokio::time::timeout(cap, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(cap)),
    }
}

/// A Source that wraps another Source with a timeout.
///
/// If the inner fetch does not resolve within the configured duration, it is
/// dropped and the fetch fails with [`FetchError::Timeout`]. Other fetches in
/// flight on the same runtime are not affected.
///
/// # Example
///
/// ```rust,ignore
/// use seqflow_std::source::{DelayedValueSource, TimeoutSource};
/// use std::time::Duration;
///
/// // A 3 second call capped at 1 second always times out.
/// let slow = DelayedValueSource::identity(Duration::from_secs(3));
/// let capped = TimeoutSource::secs(slow, 1);
/// ```
#[derive(Debug, Clone)]
pub struct TimeoutSource<S> {
    inner: S,
    duration: Duration,
}

impl<S> TimeoutSource<S> {
    /// Create a new `TimeoutSource` wrapping the given source.
    pub fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Create a `TimeoutSource` with the cap specified in seconds.
    pub fn secs(inner: S, seconds: u64) -> Self {
        Self::new(inner, Duration::from_secs(seconds))
    }

    /// Create a `TimeoutSource` with the cap specified in milliseconds.
    pub fn millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the configured cap.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get a reference to the inner source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Source> Source for TimeoutSource<S> {
    type Output = S::Output;

    async fn fetch(&self, id: &RequestId) -> Result<S::Output, FetchError> {
        capped(Some(self.duration), self.inner.fetch(id)).await
    }

    async fn fetch_stage(
        &self,
        id: &RequestId,
        upstream: &[S::Output],
    ) -> Result<S::Output, FetchError> {
        capped(Some(self.duration), self.inner.fetch_stage(id, upstream)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DelayedValueSource;

    #[test]
    fn test_timeout_source_creation() {
        let source = TimeoutSource::secs(DelayedValueSource::identity(Duration::ZERO), 5);
        assert_eq!(source.duration(), Duration::from_secs(5));
        assert_eq!(source.inner().delay(), Duration::ZERO);

        let source = TimeoutSource::millis((), 500);
        assert_eq!(source.duration(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_trigger() {
        let inner = DelayedValueSource::identity(Duration::from_millis(50));
        let source = TimeoutSource::millis(inner, 10);

        let err = source.fetch(&RequestId::Number(1)).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("10ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_success() {
        let inner = DelayedValueSource::identity(Duration::from_millis(10));
        let source = TimeoutSource::millis(inner, 100);

        let value = source.fetch(&RequestId::Number(1)).await.unwrap();
        assert_eq!(value, RequestId::Number(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_fetch_keeps_upstream_and_cap() {
        let inner = DelayedValueSource::chained(Duration::from_millis(10), |_, upstream: &[u8]| {
            upstream.len() as u8
        });
        let id = RequestId::Number(1);

        let value = TimeoutSource::millis(inner.clone(), 50).fetch_stage(&id, &[4, 5]).await;
        assert_eq!(value.unwrap(), 2);

        let err = TimeoutSource::millis(inner, 5)
            .fetch_stage(&id, &[4, 5])
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_equal_to_cap_resolves() {
        let value = capped(
            Some(Duration::from_millis(20)),
            DelayedValueSource::constant(Duration::from_millis(20), 7u8)
                .fetch(&RequestId::Number(1)),
        )
        .await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_uncapped_passes_through() {
        let value = capped(None, async { Ok::<_, FetchError>(3) }).await;
        assert_eq!(value.unwrap(), 3);
    }
}
