use super::{context::RunContext, step_label};
use seqflow_core::{RequestId, SequenceError, Source};

/// Fetch `ids` one by one, in order.
///
/// Stops at the first failure; nothing after the failing id is issued and the
/// values fetched so far are discarded.
pub(crate) async fn run<S: Source>(
    source: &S,
    ids: &[RequestId],
    ctx: &RunContext<'_>,
) -> Result<Vec<S::Output>, SequenceError> {
    let mut values = Vec::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        match ctx.fetch(source, index, id).await {
            Ok(value) => values.push(value),
            Err(err) => {
                return Err(SequenceError::from_fetch(
                    index,
                    id.clone(),
                    step_label(index),
                    err,
                ));
            }
        }
    }
    Ok(values)
}
