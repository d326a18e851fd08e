//! Recomputation after movement
//!
//! Positions are sampled until they stop changing, then the recomputation is
//! handed to the debouncer so a burst of moves produces a single pass.

use std::future::Future;

use crate::core::config::FlankConfig;
use crate::refresh::debounce::Debouncer;
use crate::refresh::settle::watch_until_settled;

/// Wait for the positions returned by `sample` to settle, then schedule `job` after the update delay
///
/// Sampling uses `settle_interval_ms` and `settle_checks`; the job is queued
/// with `update_delay_ms`, superseding anything still pending. Returns the
/// number of samples taken.
pub async fn recompute_when_settled<P, F, J, Fut>(
    config: &FlankConfig,
    debouncer: &mut Debouncer,
    sample: F,
    job: J,
) -> u32
where
    P: PartialEq,
    F: FnMut() -> P,
    J: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let delay = config.update_delay();
    watch_until_settled(config.settle_interval(), config.settle_checks, sample, || {
        debouncer.schedule(delay, job);
        std::future::ready(())
    })
    .await
}
