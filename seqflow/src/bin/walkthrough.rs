//! Runs each strategy once against the simulated source and logs the result.
//!
//! ```text
//! RUST_LOG=debug cargo run --features cli --bin seqflow-walkthrough
//! ```

use seqflow::{
    RequestId, SequenceOutcome, Sequencer, SequencerConfig, Strategy, run_sequence,
    sinks::LoggingSink, source::DelayedValueSource,
};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let ids = RequestId::numbered([1, 2, 3]);
    let delay = Duration::from_millis(300);
    let cap = Duration::from_millis(500);

    for strategy in [Strategy::Strict, Strategy::Parallel, Strategy::Tolerant] {
        report(strategy, run_sequence(&ids, strategy, delay, cap).await);
    }

    // The same parallel run with a cap shorter than the delay.
    report(
        Strategy::Parallel,
        run_sequence(&ids[..2], Strategy::Parallel, delay, Duration::from_millis(100)).await,
    );

    // A tolerant chain whose middle stage fails.
    let flaky = DelayedValueSource::identity(delay).failing_on([RequestId::Number(2)]);
    let sequencer = Sequencer::new(flaky)
        .with_config(SequencerConfig::default().with_timeout(cap))
        .with_sink(LoggingSink::named("tolerant_chain"));
    match sequencer.tolerant(&ids).await {
        Ok(partial) => {
            for (stage, outcome) in partial.stages() {
                tracing::info!(%stage, ?outcome, "stage settled");
            }
            tracing::info!(state = ?partial.state(), "tolerant chain finished");
        }
        Err(err) => tracing::error!(error = %err, "tolerant chain failed"),
    }
}

fn report<V: std::fmt::Debug>(
    strategy: Strategy,
    result: Result<SequenceOutcome<V>, seqflow::SequenceError>,
) {
    match result {
        Ok(SequenceOutcome::Values(values)) => {
            tracing::info!(%strategy, ?values, "sequence fulfilled");
        }
        Ok(SequenceOutcome::Partial(partial)) => {
            tracing::info!(%strategy, state = ?partial.state(), ?partial, "sequence fulfilled");
        }
        Err(err) => tracing::error!(%strategy, error = %err, "sequence rejected"),
    }
}
