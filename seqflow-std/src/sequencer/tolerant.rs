use super::{config::SequencerConfig, context::RunContext};
use seqflow_core::{
    Diagnostic, EmptyUpstream, PartialResult, RequestId, SequenceError, Source, StageOutcome,
};

/// Run `ids` as a chain of stages, one stage per id.
///
/// A stage starts only after the previous one settled and is fetched with the
/// values that stage handed down. The first stage is mandatory and its failure
/// ends the run. Any later stage that fails is recorded as absent and hands an
/// empty default downstream; a stage that receives an empty upstream follows
/// the configured [`EmptyUpstream`] policy.
pub(crate) async fn run<S: Source>(
    source: &S,
    ids: &[RequestId],
    config: &SequencerConfig,
    ctx: &RunContext<'_>,
) -> Result<PartialResult<S::Output>, SequenceError> {
    let Some((head, rest)) = ids.split_first() else {
        return Err(SequenceError::EmptyChain);
    };

    let stage = config.stage_name(0);
    let value = match ctx.fetch(source, 0, head).await {
        Ok(value) => value,
        Err(err) => {
            return Err(SequenceError::Upstream {
                index: 0,
                id: head.clone(),
                stage,
                source: err,
            });
        }
    };
    let mut result = PartialResult::new().with_stage(stage, StageOutcome::Present(vec![value]));

    for (offset, id) in rest.iter().enumerate() {
        let index = offset + 1;
        let stage = config.stage_name(index);

        let upstream = result.upstream();
        let outcome = if upstream.is_empty() {
            on_empty_upstream(source, index, id, config.empty_upstream(), ctx).await
        } else {
            match ctx.fetch_stage(source, index, id, upstream).await {
                Ok(value) => StageOutcome::Present(vec![value]),
                Err(err) => StageOutcome::Absent {
                    reason: err.to_string(),
                },
            }
        };

        match &outcome {
            StageOutcome::Present(_) => {}
            StageOutcome::Absent { reason } => {
                tracing::debug!(%stage, %reason, "stage degraded");
                ctx.emit(Diagnostic::StageDegraded {
                    stage: stage.clone(),
                    reason: reason.clone(),
                });
            }
            StageOutcome::Skipped => {
                tracing::debug!(%stage, "stage skipped");
                ctx.emit(Diagnostic::StageSkipped {
                    stage: stage.clone(),
                });
            }
        }
        result = result.with_stage(stage, outcome);
    }

    Ok(result)
}

async fn on_empty_upstream<S: Source>(
    source: &S,
    index: usize,
    id: &RequestId,
    policy: EmptyUpstream,
    ctx: &RunContext<'_>,
) -> StageOutcome<S::Output> {
    match policy {
        EmptyUpstream::Attempt => match ctx.fetch_stage(source, index, id, &[]).await {
            Ok(value) => StageOutcome::Present(vec![value]),
            Err(_) => StageOutcome::Skipped,
        },
        EmptyUpstream::Skip => StageOutcome::Skipped,
        EmptyUpstream::Reject => StageOutcome::Absent {
            reason: "upstream stage produced no values".to_owned(),
        },
    }
}
