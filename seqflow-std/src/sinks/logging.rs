//! Logging sink - diagnostics forwarded to `tracing`.

use seqflow_core::{Diagnostic, DiagnosticSink};

/// A sink that forwards diagnostics to `tracing`.
///
/// Fetch completions are logged at `info`, one line each. Failures and
/// degraded stages are logged at `warn`, everything else at `debug`.
///
/// # Example
///
/// ```rust,ignore
/// use seqflow_std::{Sequencer, sinks::LoggingSink};
///
/// let sequencer = Sequencer::new(source).with_sink(LoggingSink::named("profile_page"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingSink {
    name: &'static str,
}

impl LoggingSink {
    /// Create a new `LoggingSink` with a default name.
    pub fn new() -> Self {
        Self { name: "sequence" }
    }

    /// Create a new `LoggingSink` with a custom name.
    ///
    /// The name is attached to every log line to tell runs apart.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name attached to log lines.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for LoggingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        let name = self.name;
        match diagnostic {
            Diagnostic::RunStarted { strategy, requests } => {
                tracing::debug!(sink = name, %strategy, requests, "run started");
            }
            Diagnostic::FetchIssued { index, id } => {
                tracing::debug!(sink = name, index, %id, "fetch issued");
            }
            Diagnostic::FetchCompleted { index, id, elapsed } => {
                tracing::info!(sink = name, index, %id, ?elapsed, "data fetched");
            }
            Diagnostic::FetchFailed {
                index,
                id,
                reason,
                elapsed,
            } => {
                tracing::warn!(sink = name, index, %id, %reason, ?elapsed, "fetch failed");
            }
            Diagnostic::FetchCancelled { index, id } => {
                tracing::debug!(sink = name, index, %id, "fetch cancelled");
            }
            Diagnostic::StageDegraded { stage, reason } => {
                tracing::warn!(sink = name, %stage, %reason, "stage degraded, using empty default");
            }
            Diagnostic::StageSkipped { stage } => {
                tracing::debug!(sink = name, %stage, "stage skipped");
            }
            Diagnostic::RunFinished { state, elapsed } => {
                tracing::debug!(sink = name, ?state, ?elapsed, "run finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_core::{RequestId, RunState, Strategy};
    use std::{
        io,
        sync::{Arc, Mutex},
        time::Duration,
    };

    /// Shared buffer the fmt layer writes log lines into.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    /// Record `diagnostics` under a subscriber that captures every level.
    fn capture(sink: &LoggingSink, diagnostics: &[Diagnostic]) -> Vec<String> {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(Mutex::new(captured.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            for diagnostic in diagnostics {
                sink.record(diagnostic);
            }
        });
        captured.lines()
    }

    #[test]
    fn test_completion_logs_one_info_line() {
        let lines = capture(
            &LoggingSink::named("profile_page"),
            &[Diagnostic::FetchCompleted {
                index: 0,
                id: RequestId::Number(1),
                elapsed: Duration::from_secs(3),
            }],
        );

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("data fetched"));
        assert!(lines[0].contains("profile_page"));
        assert!(lines[0].contains("id=#1"));
    }

    #[test]
    fn test_levels_follow_severity() {
        let lines = capture(
            &LoggingSink::new(),
            &[
                Diagnostic::FetchIssued {
                    index: 0,
                    id: RequestId::Number(1),
                },
                Diagnostic::FetchFailed {
                    index: 0,
                    id: RequestId::Number(1),
                    reason: "down".into(),
                    elapsed: Duration::ZERO,
                },
                Diagnostic::StageDegraded {
                    stage: "posts".into(),
                    reason: "down".into(),
                },
                Diagnostic::StageSkipped {
                    stage: "comments".into(),
                },
            ],
        );

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("DEBUG") && lines[0].contains("fetch issued"));
        assert!(lines[1].contains("WARN") && lines[1].contains("fetch failed"));
        assert!(lines[2].contains("WARN") && lines[2].contains("stage degraded"));
        assert!(lines[3].contains("DEBUG") && lines[3].contains("stage skipped"));
        assert!(lines.iter().all(|line| !line.contains("INFO")));
    }

    #[test]
    fn test_logging_sink_accepts_every_record() {
        let sink = LoggingSink::new();
        assert_eq!(sink.name(), "sequence");

        for diagnostic in [
            Diagnostic::RunStarted {
                strategy: Strategy::Strict,
                requests: 1,
            },
            Diagnostic::FetchIssued {
                index: 0,
                id: RequestId::Number(1),
            },
            Diagnostic::FetchCompleted {
                index: 0,
                id: RequestId::Number(1),
                elapsed: Duration::from_secs(3),
            },
            Diagnostic::RunFinished {
                state: RunState::Fulfilled,
                elapsed: Duration::from_secs(3),
            },
        ] {
            sink.record(&diagnostic);
        }
    }

    #[test]
    fn test_logging_sink_named() {
        assert_eq!(LoggingSink::named("my_pipeline").name(), "my_pipeline");
    }
}
