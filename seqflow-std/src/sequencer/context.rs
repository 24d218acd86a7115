use crate::source::capped;
use seqflow_core::{Diagnostic, DiagnosticSink, FetchError, RequestId, Source};
use std::{future::Future, time::Duration};
use tokio::time::Instant;

/// Per-run state shared by every fetch of one run.
pub(crate) struct RunContext<'a> {
    sink: &'a dyn DiagnosticSink,
    started: Instant,
    cap: Option<Duration>,
}

impl<'a> RunContext<'a> {
    pub(crate) fn new(sink: &'a dyn DiagnosticSink, cap: Option<Duration>) -> Self {
        Self {
            sink,
            started: Instant::now(),
            cap,
        }
    }

    pub(crate) fn emit(&self, diagnostic: Diagnostic) {
        self.sink.record(&diagnostic);
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Issue one capped fetch and report how it settled.
    pub(crate) async fn fetch<S: Source>(
        &self,
        source: &S,
        index: usize,
        id: &RequestId,
    ) -> Result<S::Output, FetchError> {
        self.track(index, id, source.fetch(id)).await
    }

    /// Like [`fetch`](Self::fetch), for a chain stage fed `upstream`.
    pub(crate) async fn fetch_stage<S: Source>(
        &self,
        source: &S,
        index: usize,
        id: &RequestId,
        upstream: &[S::Output],
    ) -> Result<S::Output, FetchError> {
        self.track(index, id, source.fetch_stage(id, upstream)).await
    }

    async fn track<T>(
        &self,
        index: usize,
        id: &RequestId,
        fetch: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        self.emit(Diagnostic::FetchIssued {
            index,
            id: id.clone(),
        });

        let mut in_flight = InFlight {
            ctx: self,
            index,
            id,
            settled: false,
        };
        let result = capped(self.cap, fetch).await;
        in_flight.settled = true;

        let elapsed = self.elapsed();
        match &result {
            Ok(_) => {
                tracing::trace!(index, %id, ?elapsed, "fetch completed");
                self.emit(Diagnostic::FetchCompleted {
                    index,
                    id: id.clone(),
                    elapsed,
                });
            }
            Err(err) => {
                tracing::debug!(index, %id, error = %err, "fetch failed");
                self.emit(Diagnostic::FetchFailed {
                    index,
                    id: id.clone(),
                    reason: err.to_string(),
                    elapsed,
                });
            }
        }
        result
    }
}

/// Reports a fetch as cancelled if its future is dropped before it settles.
struct InFlight<'c, 'a> {
    ctx: &'c RunContext<'a>,
    index: usize,
    id: &'c RequestId,
    settled: bool,
}

impl Drop for InFlight<'_, '_> {
    fn drop(&mut self) {
        if !self.settled {
            self.ctx.emit(Diagnostic::FetchCancelled {
                index: self.index,
                id: self.id.clone(),
            });
        }
    }
}
