//! Movement settle detection
//!
//! The host reports when a move starts but not reliably when its animation
//! ends. A settle check samples the token's position on a fixed interval and
//! reports it settled once enough consecutive samples show no change.

use std::future::Future;
use std::time::Duration;

/// Result of one position observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleState {
    Moving,
    Settled,
}

/// Counts consecutive unchanged position samples
#[derive(Debug, Clone)]
pub struct SettleTracker<P: PartialEq> {
    last: Option<P>,
    stable: u32,
    required: u32,
}

impl<P: PartialEq> SettleTracker<P> {
    /// `required` unchanged samples (after the first) mark the token settled
    pub fn new(required: u32) -> Self {
        Self {
            last: None,
            stable: 0,
            required: required.max(1),
        }
    }

    pub fn observe(&mut self, position: P) -> SettleState {
        match &self.last {
            Some(last) if *last == position => self.stable += 1,
            _ => self.stable = 0,
        }
        self.last = Some(position);

        if self.stable >= self.required {
            SettleState::Settled
        } else {
            SettleState::Moving
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.stable = 0;
    }
}

/// Call `sample` every `interval` until the position settles, then run `on_settled`
///
/// Returns the number of samples taken.
pub async fn watch_until_settled<P, F, S, Fut>(
    interval: Duration,
    required: u32,
    mut sample: F,
    on_settled: S,
) -> u32
where
    P: PartialEq,
    F: FnMut() -> P,
    S: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut tracker = SettleTracker::new(required);
    let mut ticker = tokio::time::interval(interval);
    let mut samples = 0;

    loop {
        ticker.tick().await;
        samples += 1;
        if tracker.observe(sample()) == SettleState::Settled {
            break;
        }
    }

    on_settled().await;
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Square;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_settles_after_one_unchanged_sample() {
        let mut tracker = SettleTracker::new(1);
        assert_eq!(tracker.observe(Square::new(0, 0)), SettleState::Moving);
        assert_eq!(tracker.observe(Square::new(1, 0)), SettleState::Moving);
        assert_eq!(tracker.observe(Square::new(1, 0)), SettleState::Settled);
    }

    #[test]
    fn test_movement_resets_count() {
        let mut tracker = SettleTracker::new(2);
        tracker.observe(1);
        assert_eq!(tracker.observe(1), SettleState::Moving);
        assert_eq!(tracker.observe(2), SettleState::Moving);
        assert_eq!(tracker.observe(2), SettleState::Moving);
        assert_eq!(tracker.observe(2), SettleState::Settled);
    }

    #[test]
    fn test_reset_forgets_position() {
        let mut tracker = SettleTracker::new(1);
        tracker.observe(5);
        tracker.reset();
        assert_eq!(tracker.observe(5), SettleState::Moving);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_until_settled() {
        let path = [0, 1, 2, 3, 3];
        let mut index = 0;
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let samples = watch_until_settled(
            Duration::from_millis(300),
            1,
            || {
                let pos = path[index.min(path.len() - 1)];
                index += 1;
                pos
            },
            || async move { flag.store(true, Ordering::SeqCst) },
        )
        .await;

        assert_eq!(samples, 5);
        assert!(fired.load(Ordering::SeqCst));
    }
}
