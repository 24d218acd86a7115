//! Diagnostic side channel.
//!
//! Sequencer runs report what they do to a [`DiagnosticSink`]. Diagnostics are
//! never part of a run's result: swapping the sink, or disabling it with
//! [`NullSink`], does not change any value a run produces.

use crate::{request::RequestId, state::RunState, strategy::Strategy};
use std::time::Duration;

/// One diagnostic record.
///
/// `elapsed` fields are measured from the start of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A run left `Pending`.
    RunStarted {
        /// The composition strategy.
        strategy: Strategy,
        /// Number of requested ids.
        requests: usize,
    },
    /// A fetch was handed to the source.
    FetchIssued {
        /// Position in the input list.
        index: usize,
        /// The request.
        id: RequestId,
    },
    /// A fetch resolved.
    FetchCompleted {
        /// Position in the input list.
        index: usize,
        /// The request.
        id: RequestId,
        /// Time since the run started.
        elapsed: Duration,
    },
    /// A fetch failed.
    FetchFailed {
        /// Position in the input list.
        index: usize,
        /// The request.
        id: RequestId,
        /// Rendered error.
        reason: String,
        /// Time since the run started.
        elapsed: Duration,
    },
    /// An in-flight fetch was dropped because a sibling failed.
    FetchCancelled {
        /// Position in the input list.
        index: usize,
        /// The request.
        id: RequestId,
    },
    /// An optional stage failed and was replaced by an empty default.
    StageDegraded {
        /// Stage name.
        stage: String,
        /// Rendered error.
        reason: String,
    },
    /// A stage was not run, or its failure on empty input was ignored.
    StageSkipped {
        /// Stage name.
        stage: String,
    },
    /// A run reached a terminal state.
    RunFinished {
        /// The terminal state.
        state: RunState,
        /// Total run time.
        elapsed: Duration,
    },
}

impl Diagnostic {
    /// The request this record refers to, if it is a per-fetch record.
    pub fn request(&self) -> Option<&RequestId> {
        match self {
            Diagnostic::FetchIssued { id, .. }
            | Diagnostic::FetchCompleted { id, .. }
            | Diagnostic::FetchFailed { id, .. }
            | Diagnostic::FetchCancelled { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Receiver for [`Diagnostic`] records.
///
/// Sinks are shared by every fetch of a run, so `record` takes `&self`.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Receive one record.
    fn record(&self, diagnostic: &Diagnostic);
}

/// A sink that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync + 'static,
{
    fn record(&self, diagnostic: &Diagnostic) {
        (self)(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let sink = move |d: &Diagnostic| {
            if d.request().is_some() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        };

        sink.record(&Diagnostic::FetchIssued {
            index: 0,
            id: RequestId::Number(1),
        });
        sink.record(&Diagnostic::StageSkipped {
            stage: "comments".into(),
        });
        NullSink.record(&Diagnostic::FetchCancelled {
            index: 1,
            id: RequestId::Number(2),
        });

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
