// src/settle.rs
// Settle-and-tolerate fan-in: run every future to completion and hand the
// caller the full list of outcomes. The isolation policy (one failure never
// blocks the others) lives here as an explicit, testable function instead of
// implicit control flow in the orchestrator.

use futures::future::join_all;
use std::future::Future;

/// Await all futures concurrently; no early abort on error.
pub async fn settle_all<T, E, Fut>(futures: impl IntoIterator<Item = Fut>) -> Vec<Result<T, E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// Split settled outcomes into successes and failures, preserving order.
pub fn partition<T, E>(settled: Vec<Result<T, E>>) -> (Vec<T>, Vec<E>) {
    let mut oks = Vec::with_capacity(settled.len());
    let mut errs = Vec::new();
    for outcome in settled {
        match outcome {
            Ok(v) => oks.push(v),
            Err(e) => errs.push(e),
        }
    }
    (oks, errs)
}
