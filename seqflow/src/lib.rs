//! # seqflow - Sequencing Delayed Async Fetches
//!
//! `seqflow` composes simulated remote calls under one of three strategies:
//!
//! - **Strict**: one fetch after another, aborting on the first failure
//! - **Parallel**: all fetches at once, values kept in request order
//! - **Tolerant**: a chain of stages where only the first one is mandatory
//!
//! Everything runs on cooperative async scheduling: fetches suspend at
//! explicit await points and interleave on a single thread.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seqflow::{RequestId, Strategy, run_sequence};
//! use std::time::Duration;
//!
//! let outcome = run_sequence(
//!     &RequestId::numbered([1, 2, 3]),
//!     Strategy::Strict,
//!     Duration::from_secs(3),
//!     Duration::from_secs(5),
//! )
//! .await?;
//! assert_eq!(outcome.values(), Some(&[200, 200, 200][..]));
//! ```
//!
//! For custom sources, sinks or policies build a [`Sequencer`] directly.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

use std::time::Duration;

pub use seqflow_core::{
    // Errors
    BoxError,
    // Sources
    BoxFetch,
    BoxSource,
    // Results
    ChainState,
    // Diagnostics
    Diagnostic,
    DiagnosticSink,
    DynSource,
    // Policies
    EmptyUpstream,
    FetchError,
    FetchFailure,
    NullSink,
    ParallelPolicy,
    PartialResult,
    // Requests
    RequestId,
    RunState,
    SequenceError,
    SequenceOutcome,
    Source,
    StageOutcome,
    StateError,
    Strategy,
    Value,
};

pub use seqflow_std::{DEFAULT_STAGE_NAMES, Sequencer, SequencerConfig};

/// Standard sources.
pub mod source {
    pub use seqflow_std::source::{DelayedValueSource, SimulatedFailure, TimeoutSource, capped};
}

/// Standard diagnostic sinks.
pub mod sinks {
    pub use seqflow_std::sinks::{LoggingSink, NullSink};
}

/// Testing utilities.
pub mod testing {
    pub use seqflow_std::testing::{
        CollectingSink, CountingSource, ScriptedSource, assert_elapsed,
    };
}

/// Prelude module - common imports for seqflow.
///
/// # Usage
///
/// ```rust,ignore
/// use seqflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DiagnosticSink, EmptyUpstream, FetchError, ParallelPolicy, PartialResult, RequestId,
        SequenceError, SequenceOutcome, Sequencer, SequencerConfig, Source, StageOutcome,
        Strategy, run_sequence,
        source::{DelayedValueSource, TimeoutSource},
    };
}

/// Value every simulated fetch of [`run_sequence`] resolves to.
pub const SIMULATED_STATUS: u16 = 200;

/// Run `ids` under `strategy` against a simulated source.
///
/// Every fetch takes `per_fetch_delay` and resolves to [`SIMULATED_STATUS`].
/// A fetch still pending after `timeout` fails with a timeout. Diagnostics
/// go to a [`LoggingSink`](sinks::LoggingSink).
///
/// Parallel runs fail fast and tolerant runs use the default stage names and
/// empty-upstream policy; build a [`Sequencer`] to change either.
pub async fn run_sequence(
    ids: &[RequestId],
    strategy: Strategy,
    per_fetch_delay: Duration,
    timeout: Duration,
) -> Result<SequenceOutcome<u16>, SequenceError> {
    let source = source::DelayedValueSource::constant(per_fetch_delay, SIMULATED_STATUS);
    Sequencer::new(source)
        .with_config(SequencerConfig::default().with_timeout(timeout))
        .with_sink(sinks::LoggingSink::new())
        .run(ids, strategy)
        .await
}
