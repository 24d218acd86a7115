//! # seqflow-core
//!
//! Core traits and data types for the seqflow async sequencing toolkit.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that provides its own sources or sinks without pulling in the runtime
//! pieces of `seqflow-std`.
//!
//! # Building Blocks
//!
//! ## Sources ([`Source`])
//!
//! A source resolves a [`RequestId`] to a value after some delay. It is the
//! only thing a sequencer calls; every strategy is a composition of `fetch`
//! calls. Use [`DynSource`] / [`BoxSource`] for heterogeneous collections.
//!
//! ## Strategies ([`Strategy`])
//!
//! - **Strict**: one fetch at a time, abort on the first failure
//! - **Parallel**: all fetches at once, failure policy set by [`ParallelPolicy`]
//! - **Tolerant**: mandatory first stage, optional later stages, empty-input
//!   behavior set by [`EmptyUpstream`]
//!
//! ## Results ([`SequenceOutcome`])
//!
//! Strict and parallel runs produce ordered values; tolerant runs produce a
//! [`PartialResult`]. A run moves through [`RunState`] and ends either
//! `Fulfilled` or `Rejected`.
//!
//! ## Diagnostics ([`DiagnosticSink`])
//!
//! Runs report progress as [`Diagnostic`] records to an injected sink.
//!
//! # Error Types
//!
//! - [`FetchError`] - A single fetch failed
//! - [`SequenceError`] - A run failed
//! - [`StateError`] - Illegal lifecycle transition

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod diagnostic;
mod error;
mod outcome;
mod request;
mod source;
mod state;
mod strategy;

// Re-exports
pub use diagnostic::{Diagnostic, DiagnosticSink, NullSink};
pub use error::{BoxError, FetchError, FetchFailure, SequenceError, StateError};
pub use outcome::{ChainState, PartialResult, SequenceOutcome, StageOutcome};
pub use request::{RequestId, Value};
pub use source::{BoxFetch, BoxSource, DynSource, Source};
pub use state::RunState;
pub use strategy::{EmptyUpstream, ParallelPolicy, Strategy};
