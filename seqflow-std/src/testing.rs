//! Testing utilities for seqflow.
//!
//! This module provides utilities to make testing sources and sequencer runs
//! easier.
//!
//! # Features
//!
//! - [`CollectingSink`]: A sink that records every diagnostic it receives
//! - [`CountingSource`]: A source wrapper that counts and orders its calls
//! - [`ScriptedSource`]: A source with per-id delays and failures
//! - [`assert_elapsed`]: Virtual-time assertion for paused tokio clocks

use seqflow_core::{Diagnostic, DiagnosticSink, FetchError, RequestId, RunState, Source};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::time::Instant;

// ============================================================================
// Collecting Sink
// ============================================================================

/// A sink that records all diagnostics it receives.
///
/// Clones share the same record list, so keep one clone and hand the other to
/// the sequencer.
///
/// # Example
///
/// ```rust,ignore
/// let sink = CollectingSink::new();
/// let sequencer = Sequencer::new(source).with_sink(sink.clone());
///
/// sequencer.strict(&ids).await?;
///
/// assert_eq!(sink.completed(), ids);
/// ```
#[derive(Clone, Default)]
pub struct CollectingSink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded diagnostics.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().unwrap().clone()
    }

    /// Get the number of recorded diagnostics.
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Clear all recorded diagnostics.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Ids of completed fetches, in completion order.
    pub fn completed(&self) -> Vec<RequestId> {
        self.filter_ids(|d| matches!(d, Diagnostic::FetchCompleted { .. }))
    }

    /// Ids of failed fetches, in failure order.
    pub fn failed(&self) -> Vec<RequestId> {
        self.filter_ids(|d| matches!(d, Diagnostic::FetchFailed { .. }))
    }

    /// Ids of issued fetches, in issue order.
    pub fn issued(&self) -> Vec<RequestId> {
        self.filter_ids(|d| matches!(d, Diagnostic::FetchIssued { .. }))
    }

    /// Ids of fetches dropped before they settled.
    pub fn cancelled(&self) -> Vec<RequestId> {
        self.filter_ids(|d| matches!(d, Diagnostic::FetchCancelled { .. }))
    }

    /// Names of skipped stages.
    pub fn skipped_stages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| match d {
                Diagnostic::StageSkipped { stage } => Some(stage.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names of degraded stages.
    pub fn degraded_stages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| match d {
                Diagnostic::StageDegraded { stage, .. } => Some(stage.clone()),
                _ => None,
            })
            .collect()
    }

    /// Terminal states of finished runs, in order.
    pub fn finished_states(&self) -> Vec<RunState> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| match d {
                Diagnostic::RunFinished { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn filter_ids(&self, keep: impl Fn(&Diagnostic) -> bool) -> Vec<RequestId> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|d| keep(d))
            .filter_map(|d| d.request().cloned())
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        self.records.lock().unwrap().push(diagnostic.clone());
    }
}

// ============================================================================
// Counting Source
// ============================================================================

/// A source wrapper that counts fetches and remembers the order they were
/// issued in.
///
/// # Example
///
/// ```rust,ignore
/// let counting = CountingSource::new(source);
/// let sequencer = Sequencer::new(counting.clone());
///
/// let _ = sequencer.strict(&ids).await;
///
/// assert_eq!(counting.count(), 2);
/// ```
pub struct CountingSource<S> {
    inner: Arc<S>,
    count: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<RequestId>>>,
}

impl<S> CountingSource<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
            count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of fetches issued.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Get the ids fetched, in issue order.
    pub fn calls(&self) -> Vec<RequestId> {
        self.calls.lock().unwrap().clone()
    }

    /// Reset the counter and call log.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
        self.calls.lock().unwrap().clear();
    }
}

impl<S> Clone for CountingSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            count: self.count.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<S: Source> Source for CountingSource<S> {
    type Output = S::Output;

    async fn fetch(&self, id: &RequestId) -> Result<S::Output, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(id.clone());
        self.inner.fetch(id).await
    }

    async fn fetch_stage(
        &self,
        id: &RequestId,
        upstream: &[S::Output],
    ) -> Result<S::Output, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(id.clone());
        self.inner.fetch_stage(id, upstream).await
    }
}

// ============================================================================
// Scripted Source
// ============================================================================

/// A source whose delay and outcome are scripted per id.
///
/// Unscripted ids resolve to themselves after the default delay. Stage
/// fetches remember the upstream values they were given; clones share that
/// log.
///
/// # Example
///
/// ```rust,ignore
/// let source = ScriptedSource::new(Duration::from_millis(10))
///     .delay_for(RequestId::Number(1), Duration::from_millis(30))
///     .fail(RequestId::Number(2))
///     .fail_on_empty(RequestId::Number(3));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    default_delay: Duration,
    delays: HashMap<RequestId, Duration>,
    failures: HashSet<RequestId>,
    empty_failures: HashSet<RequestId>,
    stage_inputs: Arc<Mutex<Vec<(RequestId, Vec<RequestId>)>>>,
}

impl ScriptedSource {
    /// Create a source with the given default delay.
    pub fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            delays: HashMap::new(),
            failures: HashSet::new(),
            empty_failures: HashSet::new(),
            stage_inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Use `delay` for `id`.
    pub fn delay_for(mut self, id: RequestId, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    /// Make `id` fail after its delay.
    pub fn fail(mut self, id: RequestId) -> Self {
        self.failures.insert(id);
        self
    }

    /// Make `id` fail when fetched as a stage with an empty upstream.
    pub fn fail_on_empty(mut self, id: RequestId) -> Self {
        self.empty_failures.insert(id);
        self
    }

    /// The delay used for `id`.
    pub fn delay_of(&self, id: &RequestId) -> Duration {
        self.delays.get(id).copied().unwrap_or(self.default_delay)
    }

    /// Get every stage fetch with the upstream values it received, in issue
    /// order.
    pub fn stage_inputs(&self) -> Vec<(RequestId, Vec<RequestId>)> {
        self.stage_inputs.lock().unwrap().clone()
    }

    /// Get the upstream values the last stage fetch of `id` received.
    pub fn upstream_of(&self, id: &RequestId) -> Option<Vec<RequestId>> {
        self.stage_inputs
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(stage, _)| stage == id)
            .map(|(_, upstream)| upstream.clone())
    }

    async fn resolve(&self, id: &RequestId, empty_input: bool) -> Result<RequestId, FetchError> {
        tokio::time::sleep(self.delay_of(id)).await;
        if self.failures.contains(id) {
            return Err(FetchError::Source(
                format!("scripted failure for {id}").into(),
            ));
        }
        if empty_input && self.empty_failures.contains(id) {
            return Err(FetchError::Source(
                format!("scripted failure for {id} on empty input").into(),
            ));
        }
        Ok(id.clone())
    }
}

impl Source for ScriptedSource {
    type Output = RequestId;

    async fn fetch(&self, id: &RequestId) -> Result<RequestId, FetchError> {
        self.resolve(id, false).await
    }

    async fn fetch_stage(
        &self,
        id: &RequestId,
        upstream: &[RequestId],
    ) -> Result<RequestId, FetchError> {
        self.stage_inputs
            .lock()
            .unwrap()
            .push((id.clone(), upstream.to_vec()));
        self.resolve(id, upstream.is_empty()).await
    }
}

// ============================================================================
// Virtual time
// ============================================================================

/// Assert that `expected` virtual time passed since `start`, allowing a few
/// milliseconds of timer granularity.
///
/// Meant for tests running on a paused clock
/// (`#[tokio::test(start_paused = true)]`).
#[track_caller]
pub fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
        "expected {expected:?} to elapse, got {elapsed:?}"
    );
}
