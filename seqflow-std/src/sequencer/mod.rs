//! The sequencer: composes fetches from one source under a [`Strategy`].

mod config;
mod context;
mod parallel;
mod strict;
mod tolerant;

pub use config::{DEFAULT_STAGE_NAMES, SequencerConfig};

use context::RunContext;
use seqflow_core::{
    Diagnostic, DiagnosticSink, NullSink, PartialResult, RequestId, RunState, SequenceError,
    SequenceOutcome, Source, Strategy,
};
use std::{future::Future, sync::Arc};

/// Composes fetches from a [`Source`] in series or in parallel.
///
/// A sequencer holds no per-run state: every call to [`run`](Self::run)
/// builds its result from scratch, so identical calls against a
/// deterministic source produce equal results.
///
/// # Example
///
/// ```rust,ignore
/// use seqflow_std::{Sequencer, SequencerConfig, source::DelayedValueSource};
///
/// let sequencer = Sequencer::new(DelayedValueSource::identity(Duration::from_secs(3)))
///     .with_config(SequencerConfig::default().timeout_secs(5))
///     .with_sink(LoggingSink::new());
///
/// let outcome = sequencer.run(&RequestId::numbered([1, 2, 3]), Strategy::Strict).await?;
/// ```
pub struct Sequencer<S> {
    source: S,
    config: SequencerConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S: Source> Sequencer<S> {
    /// Create a sequencer with default configuration and diagnostics disabled.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: SequencerConfig::default(),
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Send diagnostics to `sink`.
    pub fn with_sink(self, sink: impl DiagnosticSink) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    /// Send diagnostics to a sink shared with other owners.
    pub fn with_shared_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `ids` under `strategy`.
    pub async fn run(
        &self,
        ids: &[RequestId],
        strategy: Strategy,
    ) -> Result<SequenceOutcome<S::Output>, SequenceError> {
        self.run_with_state(ids, strategy).await.1
    }

    /// Run `ids` under `strategy`, also returning the terminal [`RunState`].
    pub async fn run_with_state(
        &self,
        ids: &[RequestId],
        strategy: Strategy,
    ) -> (
        RunState,
        Result<SequenceOutcome<S::Output>, SequenceError>,
    ) {
        match strategy {
            Strategy::Strict => {
                let (state, result) = self.strict_with_state(ids).await;
                (state, result.map(SequenceOutcome::Values))
            }
            Strategy::Parallel => {
                let (state, result) = self.parallel_with_state(ids).await;
                (state, result.map(SequenceOutcome::Values))
            }
            Strategy::Tolerant => {
                let (state, result) = self.tolerant_with_state(ids).await;
                (state, result.map(SequenceOutcome::Partial))
            }
        }
    }

    /// Fetch `ids` one at a time, aborting on the first failure.
    pub async fn strict(&self, ids: &[RequestId]) -> Result<Vec<S::Output>, SequenceError> {
        self.strict_with_state(ids).await.1
    }

    /// Fetch `ids` concurrently under the configured [`ParallelPolicy`].
    ///
    /// [`ParallelPolicy`]: seqflow_core::ParallelPolicy
    pub async fn parallel(&self, ids: &[RequestId]) -> Result<Vec<S::Output>, SequenceError> {
        self.parallel_with_state(ids).await.1
    }

    /// Run `ids` as a tolerant chain of stages.
    pub async fn tolerant(
        &self,
        ids: &[RequestId],
    ) -> Result<PartialResult<S::Output>, SequenceError> {
        self.tolerant_with_state(ids).await.1
    }

    async fn strict_with_state(
        &self,
        ids: &[RequestId],
    ) -> (RunState, Result<Vec<S::Output>, SequenceError>) {
        let ctx = self.context();
        let run = strict::run(&self.source, ids, &ctx);
        tracked(&ctx, Strategy::Strict, ids.len(), run).await
    }

    async fn parallel_with_state(
        &self,
        ids: &[RequestId],
    ) -> (RunState, Result<Vec<S::Output>, SequenceError>) {
        let ctx = self.context();
        let run = parallel::run(&self.source, ids, self.config.parallel_policy(), &ctx);
        tracked(&ctx, Strategy::Parallel, ids.len(), run).await
    }

    async fn tolerant_with_state(
        &self,
        ids: &[RequestId],
    ) -> (RunState, Result<PartialResult<S::Output>, SequenceError>) {
        let ctx = self.context();
        let run = tolerant::run(&self.source, ids, &self.config, &ctx);
        tracked(&ctx, Strategy::Tolerant, ids.len(), run).await
    }

    fn context(&self) -> RunContext<'_> {
        RunContext::new(self.sink.as_ref(), self.config.fetch_timeout())
    }
}

/// Drive one run through the [`RunState`] machine, reporting its start and
/// end to the sink.
async fn tracked<T>(
    ctx: &RunContext<'_>,
    strategy: Strategy,
    requests: usize,
    run: impl Future<Output = Result<T, SequenceError>>,
) -> (RunState, Result<T, SequenceError>) {
    let mut state = RunState::Pending;

    transition(&mut state, RunState::Running);
    tracing::debug!(%strategy, requests, "sequence started");
    ctx.emit(Diagnostic::RunStarted { strategy, requests });

    let result = run.await;

    match &result {
        Ok(_) => transition(&mut state, RunState::Fulfilled),
        Err(err) => {
            tracing::debug!(%strategy, error = %err, "sequence rejected");
            transition(&mut state, RunState::Rejected);
        }
    }
    let elapsed = ctx.elapsed();
    tracing::debug!(%strategy, ?state, ?elapsed, "sequence finished");
    ctx.emit(Diagnostic::RunFinished { state, elapsed });

    (state, result)
}

fn transition(state: &mut RunState, next: RunState) {
    if let Err(err) = state.advance(next) {
        tracing::error!(%err, "run state machine violated");
    }
}

/// Label of the request at `index` in strict and parallel errors.
pub(crate) fn step_label(index: usize) -> String {
    format!("step-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::DelayedValueSource,
        testing::{CollectingSink, assert_elapsed},
    };
    use seqflow_core::{ChainState, StageOutcome};
    use std::time::Duration;
    use tokio::time::Instant;

    fn source() -> DelayedValueSource<RequestId> {
        DelayedValueSource::identity(Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn strict_elapsed_is_sum_of_delays() {
        let sequencer = Sequencer::new(source());
        let start = Instant::now();

        let values = sequencer
            .strict(&RequestId::numbered([1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(values, RequestId::numbered([1, 2, 3]));
        assert_elapsed(start, Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn parallel_elapsed_is_max_of_delays() {
        let sequencer = Sequencer::new(source());
        let start = Instant::now();

        let values = sequencer
            .parallel(&RequestId::numbered([1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(values, RequestId::numbered([1, 2, 3]));
        assert_elapsed(start, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn run_states_are_reported() {
        let sink = CollectingSink::new();
        let failing = source().failing_on([RequestId::Number(2)]);
        let sequencer = Sequencer::new(failing).with_sink(sink.clone());

        let (state, result) = sequencer
            .run_with_state(&RequestId::numbered([1]), Strategy::Strict)
            .await;
        assert_eq!(state, RunState::Fulfilled);
        assert!(result.is_ok());

        let (state, result) = sequencer
            .run_with_state(&RequestId::numbered([2]), Strategy::Strict)
            .await;
        assert_eq!(state, RunState::Rejected);
        assert!(result.is_err());

        assert_eq!(
            sink.finished_states(),
            vec![RunState::Fulfilled, RunState::Rejected]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_inputs() {
        let sequencer = Sequencer::new(source());

        assert!(sequencer.strict(&[]).await.unwrap().is_empty());
        assert!(sequencer.parallel(&[]).await.unwrap().is_empty());
        assert!(matches!(
            sequencer.tolerant(&[]).await,
            Err(SequenceError::EmptyChain)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn tolerant_happy_path_is_complete() {
        let sequencer = Sequencer::new(source());

        let partial = sequencer
            .tolerant(&RequestId::numbered([1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(partial.state(), ChainState::Complete);
        assert_eq!(
            partial.get("comments"),
            Some(&StageOutcome::Present(vec![RequestId::Number(3)]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn typed_entry_points_match_run() {
        let sink = CollectingSink::new();
        let sequencer = Sequencer::new(source().failing_on([RequestId::Number(2)]))
            .with_sink(sink.clone());
        let ids = RequestId::numbered([1, 2, 3]);

        let partial = sequencer.tolerant(&ids).await.unwrap();
        let outcome = sequencer.run(&ids, Strategy::Tolerant).await.unwrap();
        assert_eq!(outcome.partial(), Some(&partial));
        assert_eq!(outcome.values(), None);

        let err = sequencer.strict(&ids).await.unwrap_err();
        assert!(matches!(err, SequenceError::Upstream { ref stage, .. } if stage == "step-1"));

        // Every entry point drives the same state machine.
        assert_eq!(
            sink.finished_states(),
            vec![RunState::Fulfilled, RunState::Fulfilled, RunState::Rejected]
        );
    }
}
