#![allow(dead_code)]

use seqflow::{
    RequestId, Sequencer, SequencerConfig,
    testing::{CollectingSink, CountingSource, ScriptedSource},
};
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub fn id(n: u64) -> RequestId {
    RequestId::Number(n)
}

pub fn ids(ns: &[u64]) -> Vec<RequestId> {
    RequestId::numbered(ns.iter().copied())
}

// ============================================================================
// Fixtures
// ============================================================================

/// A scripted source wrapped for call counting, a collecting sink, and a
/// sequencer wired to both.
pub struct Harness {
    pub counting: CountingSource<ScriptedSource>,
    pub sink: CollectingSink,
    pub sequencer: Sequencer<CountingSource<ScriptedSource>>,
}

impl Harness {
    pub fn new(source: ScriptedSource, config: SequencerConfig) -> Self {
        let counting = CountingSource::new(source);
        let sink = CollectingSink::new();
        let sequencer = Sequencer::new(counting.clone())
            .with_config(config)
            .with_sink(sink.clone());
        Self {
            counting,
            sink,
            sequencer,
        }
    }

    pub fn with_defaults(source: ScriptedSource) -> Self {
        Self::new(source, SequencerConfig::default())
    }
}
