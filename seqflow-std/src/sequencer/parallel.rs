use super::{context::RunContext, step_label};
use futures::future::{join_all, try_join_all};
use seqflow_core::{FetchFailure, ParallelPolicy, RequestId, SequenceError, Source};

/// Fetch every id concurrently. Values keep the order of `ids` no matter
/// which fetch settles first.
pub(crate) async fn run<S: Source>(
    source: &S,
    ids: &[RequestId],
    policy: ParallelPolicy,
    ctx: &RunContext<'_>,
) -> Result<Vec<S::Output>, SequenceError> {
    match policy {
        ParallelPolicy::FailFast => fail_fast(source, ids, ctx).await,
        ParallelPolicy::RunToCompletion => run_to_completion(source, ids, ctx).await,
    }
}

/// First failure wins; fetches still in flight are dropped.
async fn fail_fast<S: Source>(
    source: &S,
    ids: &[RequestId],
    ctx: &RunContext<'_>,
) -> Result<Vec<S::Output>, SequenceError> {
    let fetches = ids.iter().enumerate().map(|(index, id)| async move {
        ctx.fetch(source, index, id)
            .await
            .map_err(|err| SequenceError::from_fetch(index, id.clone(), step_label(index), err))
    });
    try_join_all(fetches).await
}

/// Every fetch settles; all failures are reported together.
async fn run_to_completion<S: Source>(
    source: &S,
    ids: &[RequestId],
    ctx: &RunContext<'_>,
) -> Result<Vec<S::Output>, SequenceError> {
    let settled = join_all(
        ids.iter()
            .enumerate()
            .map(|(index, id)| ctx.fetch(source, index, id)),
    )
    .await;

    let mut values = Vec::with_capacity(ids.len());
    let mut failures = Vec::new();
    for ((index, id), result) in ids.iter().enumerate().zip(settled) {
        match result {
            Ok(value) => values.push(value),
            Err(error) => failures.push(FetchFailure {
                index,
                id: id.clone(),
                error,
            }),
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(SequenceError::Aggregate(failures))
    }
}
