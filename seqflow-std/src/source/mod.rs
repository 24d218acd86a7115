//! Standard source implementations.

mod delayed;
mod timeout;

pub use delayed::{DelayedValueSource, SimulatedFailure};
pub use timeout::{TimeoutSource, capped};
