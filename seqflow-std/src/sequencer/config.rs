//! Sequencer configuration.

use seqflow_core::{EmptyUpstream, ParallelPolicy};
use std::time::Duration;

/// Stage names used by tolerant chains unless configured otherwise.
pub const DEFAULT_STAGE_NAMES: [&str; 3] = ["user", "posts", "comments"];

/// Configuration shared by every run of a [`Sequencer`](super::Sequencer).
///
/// # Example
///
/// ```rust,ignore
/// use seqflow_std::SequencerConfig;
///
/// let config = SequencerConfig::default()
///     .timeout_millis(5_000)
///     .with_parallel_policy(ParallelPolicy::RunToCompletion)
///     .with_empty_upstream(EmptyUpstream::Skip);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    fetch_timeout: Option<Duration>,
    parallel: ParallelPolicy,
    empty_upstream: EmptyUpstream,
    stage_names: Vec<String>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: None,
            parallel: ParallelPolicy::default(),
            empty_upstream: EmptyUpstream::default(),
            stage_names: DEFAULT_STAGE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SequencerConfig {
    /// Cap every fetch at `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Cap every fetch, in milliseconds.
    pub fn timeout_millis(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    /// Cap every fetch, in seconds.
    pub fn timeout_secs(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    /// Remove the per-fetch cap.
    pub fn without_timeout(mut self) -> Self {
        self.fetch_timeout = None;
        self
    }

    /// Set what parallel runs do with siblings of a failed fetch.
    pub fn with_parallel_policy(mut self, policy: ParallelPolicy) -> Self {
        self.parallel = policy;
        self
    }

    /// Set what tolerant stages do when upstream produced nothing.
    pub fn with_empty_upstream(mut self, policy: EmptyUpstream) -> Self {
        self.empty_upstream = policy;
        self
    }

    /// Name tolerant stages, in order.
    pub fn with_stage_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.stage_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// The per-fetch cap, if any.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    /// The parallel sibling policy.
    pub fn parallel_policy(&self) -> ParallelPolicy {
        self.parallel
    }

    /// The tolerant empty-upstream policy.
    pub fn empty_upstream(&self) -> EmptyUpstream {
        self.empty_upstream
    }

    /// Name of the stage at `index`. Stages past the configured names are
    /// called `stage-<index>`.
    pub fn stage_name(&self, index: usize) -> String {
        self.stage_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("stage-{index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SequencerConfig::default();
        assert_eq!(config.fetch_timeout(), None);
        assert_eq!(config.parallel_policy(), ParallelPolicy::FailFast);
        assert_eq!(config.empty_upstream(), EmptyUpstream::Attempt);
        assert_eq!(config.stage_name(0), "user");
        assert_eq!(config.stage_name(2), "comments");
        assert_eq!(config.stage_name(3), "stage-3");
    }

    #[test]
    fn builders() {
        let config = SequencerConfig::default()
            .timeout_secs(5)
            .with_parallel_policy(ParallelPolicy::RunToCompletion)
            .with_empty_upstream(EmptyUpstream::Reject)
            .with_stage_names(["order", "items"]);

        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.parallel_policy(), ParallelPolicy::RunToCompletion);
        assert_eq!(config.empty_upstream(), EmptyUpstream::Reject);
        assert_eq!(config.stage_name(1), "items");
        assert_eq!(config.stage_name(2), "stage-2");

        let config = config.without_timeout().timeout_millis(250);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.without_timeout().fetch_timeout(), None);
    }
}
