//! # seqflow-std
//!
//! Standard implementations for the seqflow async sequencing toolkit.
//!
//! This crate provides:
//! - **Sources**: [`DelayedValueSource`](source::DelayedValueSource),
//!   [`TimeoutSource`](source::TimeoutSource)
//! - **Sequencer**: [`Sequencer`] and [`SequencerConfig`]
//! - **Sinks**: [`LoggingSink`](sinks::LoggingSink)
//! - **Testing**: collecting sinks, counting and scripted sources

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use seqflow_core;

// Modules
pub mod sequencer;
pub mod sinks;
pub mod source;
pub mod testing;

pub use sequencer::{DEFAULT_STAGE_NAMES, Sequencer, SequencerConfig};
