//! Run lifecycle.

use crate::error::StateError;

/// Lifecycle of one sequencer run.
///
/// ```text
/// Pending -> Running -> Fulfilled
///                   \-> Rejected
/// ```
///
/// `Fulfilled` and `Rejected` are terminal. A tolerant run that lost optional
/// stages still ends `Fulfilled`; the degradation is recorded in its
/// [`PartialResult`](crate::PartialResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Created, nothing issued yet.
    #[default]
    Pending,
    /// At least one fetch may be in flight.
    Running,
    /// Produced a composed result.
    Fulfilled,
    /// Produced a failure.
    Rejected,
}

impl RunState {
    /// Whether this state is final.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected)
    }

    /// Whether `next` may follow `self`.
    pub const fn can_advance_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Running, Self::Fulfilled)
                | (Self::Running, Self::Rejected)
        )
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: RunState) -> Result<(), StateError> {
        if !self.can_advance_to(next) {
            return Err(StateError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut state = RunState::default();
        assert_eq!(state, RunState::Pending);
        state.advance(RunState::Running).unwrap();
        state.advance(RunState::Fulfilled).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [RunState::Fulfilled, RunState::Rejected] {
            for next in [
                RunState::Pending,
                RunState::Running,
                RunState::Fulfilled,
                RunState::Rejected,
            ] {
                let mut state = terminal;
                assert!(state.advance(next).is_err());
                assert_eq!(state, terminal);
            }
        }
    }

    #[test]
    fn cannot_skip_running() {
        let mut state = RunState::Pending;
        let err = state.advance(RunState::Fulfilled).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidTransition {
                from: RunState::Pending,
                to: RunState::Fulfilled
            }
        );
    }
}
