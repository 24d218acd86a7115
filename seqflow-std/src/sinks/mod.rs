//! Standard diagnostic sinks.

mod logging;

pub use logging::LoggingSink;
pub use seqflow_core::NullSink;
