//! Composed run results.

use crate::request::Value;

/// Result of one tolerant stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<V> {
    /// The stage produced these values.
    Present(Vec<V>),
    /// The stage failed; downstream saw an empty default instead.
    Absent {
        /// Rendered error.
        reason: String,
    },
    /// The stage was not run, or failed on empty input and was ignored.
    Skipped,
}

impl<V> StageOutcome<V> {
    /// Whether the stage produced values.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Whether the stage failed.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent { .. })
    }

    /// The values the stage hands downstream. Empty unless present.
    pub fn values(&self) -> &[V] {
        match self {
            Self::Present(values) => values,
            Self::Absent { .. } | Self::Skipped => &[],
        }
    }
}

/// Whether a tolerant chain lost any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    /// Every stage produced values.
    Complete,
    /// At least one optional stage was absent or skipped.
    Degraded,
}

/// Stage-by-stage result of a tolerant chain, in stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult<V> {
    stages: Vec<(String, StageOutcome<V>)>,
}

impl<V> Default for PartialResult<V> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<V: Value> PartialResult<V> {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this result with one more stage appended.
    pub fn with_stage(&self, name: impl Into<String>, outcome: StageOutcome<V>) -> Self {
        let mut stages = self.stages.clone();
        stages.push((name.into(), outcome));
        Self { stages }
    }

    /// Outcome of the named stage.
    pub fn get(&self, name: &str) -> Option<&StageOutcome<V>> {
        self.stages
            .iter()
            .find(|(stage, _)| stage == name)
            .map(|(_, outcome)| outcome)
    }

    /// Values of the named stage, if it is present.
    pub fn value(&self, name: &str) -> Option<&[V]> {
        match self.get(name)? {
            StageOutcome::Present(values) => Some(values),
            _ => None,
        }
    }

    /// Stages in the order they ran.
    pub fn stages(&self) -> impl Iterator<Item = (&str, &StageOutcome<V>)> {
        self.stages
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    /// Number of recorded stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether no stage was recorded.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The values the last recorded stage hands downstream.
    pub fn upstream(&self) -> &[V] {
        self.stages
            .last()
            .map(|(_, outcome)| outcome.values())
            .unwrap_or(&[])
    }

    /// `Degraded` if any stage is not present.
    pub fn state(&self) -> ChainState {
        if self.stages.iter().all(|(_, outcome)| outcome.is_present()) {
            ChainState::Complete
        } else {
            ChainState::Degraded
        }
    }
}

/// The uniform result of a sequencer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome<V> {
    /// One value per request, in request order (strict and parallel runs).
    Values(Vec<V>),
    /// Stage results of a tolerant chain.
    Partial(PartialResult<V>),
}

impl<V> SequenceOutcome<V> {
    /// The ordered values, for strict and parallel runs.
    pub fn values(&self) -> Option<&[V]> {
        match self {
            Self::Values(values) => Some(values),
            Self::Partial(_) => None,
        }
    }

    /// The stage results, for tolerant runs.
    pub fn partial(&self) -> Option<&PartialResult<V>> {
        match self {
            Self::Partial(partial) => Some(partial),
            Self::Values(_) => None,
        }
    }

    /// Consume the outcome, returning ordered values if it has them.
    pub fn into_values(self) -> Option<Vec<V>> {
        match self {
            Self::Values(values) => Some(values),
            Self::Partial(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_stage_leaves_original_untouched() {
        let empty = PartialResult::<u32>::new();
        let one = empty.with_stage("user", StageOutcome::Present(vec![1]));

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(one.value("user"), Some(&[1][..]));
        assert_eq!(one.upstream(), &[1]);
        assert_eq!(one.state(), ChainState::Complete);
    }

    #[test]
    fn absent_stage_degrades_chain() {
        let result = PartialResult::<u32>::new()
            .with_stage("user", StageOutcome::Present(vec![1]))
            .with_stage(
                "posts",
                StageOutcome::Absent {
                    reason: "down".into(),
                },
            );

        assert_eq!(result.state(), ChainState::Degraded);
        assert!(result.get("posts").unwrap().is_absent());
        assert_eq!(result.value("posts"), None);
        assert!(result.upstream().is_empty());
        assert!(result.get("comments").is_none());

        let names: Vec<&str> = result.stages().map(|(name, _)| name).collect();
        assert_eq!(names, ["user", "posts"]);
    }

    #[test]
    fn outcome_accessors() {
        let values = SequenceOutcome::Values(vec![200u16, 200]);
        assert_eq!(values.values(), Some(&[200, 200][..]));
        assert!(values.partial().is_none());
        assert_eq!(values.into_values(), Some(vec![200, 200]));

        let partial = SequenceOutcome::Partial(PartialResult::<u16>::new());
        assert!(partial.values().is_none());
        assert!(partial.into_values().is_none());
    }
}
