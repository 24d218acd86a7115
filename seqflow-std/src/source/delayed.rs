//! Delayed value source - a simulated remote call.

use seqflow_core::{FetchError, RequestId, Source, Value};
use std::{collections::HashSet, fmt, sync::Arc, time::Duration};
use thiserror::Error;

/// Failure reported by a [`DelayedValueSource`] for an id it was told to fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("simulated failure for {id}")]
pub struct SimulatedFailure {
    /// The id that failed.
    pub id: RequestId,
}

type ValueFn<V> = Arc<dyn Fn(&RequestId, &[V]) -> V + Send + Sync>;

/// A source that resolves every request after a fixed delay.
///
/// The value for a request is computed by a pure function of its id, so the
/// same id always yields the same value. Each fetch is independent: the source
/// keeps no state between calls.
///
/// # Example
///
/// ```rust,ignore
/// use seqflow_std::source::DelayedValueSource;
/// use std::time::Duration;
///
/// // Every id resolves to itself after 3 seconds.
/// let source = DelayedValueSource::identity(Duration::from_secs(3));
///
/// // Every id resolves to 200, except #2 which fails.
/// let source = DelayedValueSource::constant(Duration::from_secs(3), 200u16)
///     .failing_on([RequestId::Number(2)]);
/// ```
pub struct DelayedValueSource<V> {
    delay: Duration,
    value: ValueFn<V>,
    failing: HashSet<RequestId>,
}

impl DelayedValueSource<RequestId> {
    /// Resolve every id to itself.
    pub fn identity(delay: Duration) -> Self {
        Self::with_value(delay, RequestId::clone)
    }
}

impl<V: Value> DelayedValueSource<V> {
    /// Resolve every id to the same value.
    pub fn constant(delay: Duration, value: V) -> Self {
        Self::with_value(delay, move |_| value.clone())
    }

    /// Resolve ids through `value`.
    pub fn with_value<F>(delay: Duration, value: F) -> Self
    where
        F: Fn(&RequestId) -> V + Send + Sync + 'static,
    {
        Self::chained(delay, move |id, _| value(id))
    }

    /// Resolve ids through `value`, which also sees the values of the
    /// previous chain stage. Plain fetches pass an empty upstream.
    pub fn chained<F>(delay: Duration, value: F) -> Self
    where
        F: Fn(&RequestId, &[V]) -> V + Send + Sync + 'static,
    {
        Self {
            delay,
            value: Arc::new(value),
            failing: HashSet::new(),
        }
    }

    /// Make fetches of `ids` fail once their delay has elapsed.
    pub fn failing_on(mut self, ids: impl IntoIterator<Item = RequestId>) -> Self {
        self.failing.extend(ids);
        self
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolve `id` after `delay` instead of the configured delay.
    pub async fn fetch_after(&self, id: &RequestId, delay: Duration) -> Result<V, FetchError> {
        self.resolve(id, &[], delay).await
    }

    async fn resolve(
        &self,
        id: &RequestId,
        upstream: &[V],
        delay: Duration,
    ) -> Result<V, FetchError> {
        tokio::time::sleep(delay).await;

        if self.failing.contains(id) {
            tracing::trace!(%id, ?delay, "simulated fetch failed");
            return Err(FetchError::Source(Box::new(SimulatedFailure {
                id: id.clone(),
            })));
        }

        tracing::trace!(%id, ?delay, upstream = upstream.len(), "simulated fetch resolved");
        Ok((self.value)(id, upstream))
    }
}

impl<V> Clone for DelayedValueSource<V> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay,
            value: Arc::clone(&self.value),
            failing: self.failing.clone(),
        }
    }
}

impl<V> fmt::Debug for DelayedValueSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedValueSource")
            .field("delay", &self.delay)
            .field("failing", &self.failing)
            .finish_non_exhaustive()
    }
}

impl<V: Value> Source for DelayedValueSource<V> {
    type Output = V;

    async fn fetch(&self, id: &RequestId) -> Result<V, FetchError> {
        self.resolve(id, &[], self.delay).await
    }

    async fn fetch_stage(&self, id: &RequestId, upstream: &[V]) -> Result<V, FetchError> {
        self.resolve(id, upstream, self.delay).await
    }
}
