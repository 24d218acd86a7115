//! Error types for seqflow.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`FetchError`] - Failure of a single fetch
//! - [`FetchFailure`] - A fetch failure tagged with its position and id
//! - [`SequenceError`] - Failure of a whole sequencer run
//! - [`StateError`] - Illegal run state transitions

use crate::{request::RequestId, state::RunState};
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by a single fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The fetch did not resolve within its cap.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The fetch was dropped before it resolved.
    #[error("fetch was cancelled")]
    Cancelled,

    /// The source itself reported a failure.
    #[error(transparent)]
    Source(BoxError),
}

impl FetchError {
    /// Whether this failure is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<BoxError> for FetchError {
    fn from(err: BoxError) -> Self {
        FetchError::Source(err)
    }
}

/// One failed fetch of a parallel run.
#[derive(Error, Debug)]
#[error("fetch {id} at position {index} failed: {error}")]
pub struct FetchFailure {
    /// Position of the request in the input list.
    pub index: usize,
    /// The request that failed.
    pub id: RequestId,
    /// Why it failed.
    #[source]
    pub error: FetchError,
}

/// Errors that end a sequencer run.
///
/// A run that returns one of these produced no values: strict and parallel
/// runs never leak the values fetched before the failure.
#[derive(Error, Debug)]
pub enum SequenceError {
    /// A fetch exceeded the configured cap.
    #[error("fetch {id} at position {index} timed out after {cap:?}")]
    Timeout {
        /// Position of the request in the input list.
        index: usize,
        /// The request that timed out.
        id: RequestId,
        /// The cap that was exceeded.
        cap: Duration,
    },

    /// A mandatory step failed, so nothing after it was attempted.
    #[error("stage `{stage}` ({id}) failed: {source}")]
    Upstream {
        /// Position of the request in the input list.
        index: usize,
        /// The request that failed.
        id: RequestId,
        /// Name of the failed stage.
        stage: String,
        /// The underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// One or more parallel fetches failed.
    #[error("{} of the parallel fetches failed", .0.len())]
    Aggregate(Vec<FetchFailure>),

    /// A tolerant chain was started without any stage.
    #[error("a tolerant chain needs at least one stage")]
    EmptyChain,
}

impl SequenceError {
    /// Classify a fetch error raised at `index`.
    ///
    /// Timeouts become [`SequenceError::Timeout`]; everything else is an
    /// [`SequenceError::Upstream`] failure of `stage`.
    pub fn from_fetch(
        index: usize,
        id: RequestId,
        stage: impl Into<String>,
        error: FetchError,
    ) -> Self {
        match error {
            FetchError::Timeout(cap) => SequenceError::Timeout { index, id, cap },
            source => SequenceError::Upstream {
                index,
                id,
                stage: stage.into(),
                source,
            },
        }
    }

    /// Whether the run failed only because of timeouts.
    pub fn is_timeout(&self) -> bool {
        match self {
            SequenceError::Timeout { .. } => true,
            SequenceError::Upstream { source, .. } => source.is_timeout(),
            SequenceError::Aggregate(failures) => {
                !failures.is_empty() && failures.iter().all(|f| f.error.is_timeout())
            }
            _ => false,
        }
    }

    /// The individual failures behind an aggregate error.
    pub fn failures(&self) -> &[FetchFailure] {
        match self {
            SequenceError::Aggregate(failures) => failures,
            _ => &[],
        }
    }
}

/// Errors raised by the run state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The requested transition is not allowed from the current state.
    #[error("illegal run state transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the run was in.
        from: RunState,
        /// State that was requested.
        to: RunState,
    },
}
