//! Composition strategies and their policies.

use std::fmt;

/// How a run combines its fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// One fetch at a time, in request order. The first failure aborts the
    /// run and nothing after it is issued.
    #[default]
    Strict,
    /// Every fetch issued up front and awaited together. Values are placed by
    /// request index, never by completion order.
    Parallel,
    /// A chain of stages where only the first is mandatory. Later failures
    /// are recorded and replaced by an empty default.
    Tolerant,
}

impl Strategy {
    /// Lowercase name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Parallel => "parallel",
            Self::Tolerant => "tolerant",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a parallel run does with the siblings of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParallelPolicy {
    /// Return the first failure as soon as it happens and drop the fetches
    /// still in flight.
    #[default]
    FailFast,
    /// Let every fetch finish, then report all failures together as
    /// [`SequenceError::Aggregate`](crate::SequenceError::Aggregate).
    RunToCompletion,
}

/// What a tolerant stage does when its upstream produced nothing.
///
/// Upstream is empty when the previous stage was degraded or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptyUpstream {
    /// Run the stage over the empty default. A failure is then ignored and
    /// the stage is reported as skipped.
    #[default]
    Attempt,
    /// Do not run the stage; report it as skipped.
    Skip,
    /// Do not run the stage; report it as absent.
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(Strategy::default(), Strategy::Strict);
        assert_eq!(ParallelPolicy::default(), ParallelPolicy::FailFast);
        assert_eq!(EmptyUpstream::default(), EmptyUpstream::Attempt);
    }

    #[test]
    fn display() {
        assert_eq!(Strategy::Tolerant.to_string(), "tolerant");
    }
}
