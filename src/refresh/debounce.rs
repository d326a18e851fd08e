//! Debounced and periodic recomputation
//!
//! A request scheduled while an earlier delayed request is still pending
//! cancels and replaces it. The periodic loop is a backstop for state changes
//! the host never reports.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Holds at most one pending delayed job
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` after `delay`, superseding any job still waiting
    pub fn schedule<F, Fut>(&mut self, delay: Duration, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                tracing::debug!("Superseding pending recomputation");
            }
            handle.abort();
        }
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job().await;
        }));
    }

    /// Whether a scheduled job has not yet finished
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start the periodic refresh loop, or return `None` when `interval` is `None`
///
/// The first run happens one full interval after starting.
pub fn spawn_auto_refresh<F, Fut>(interval: Option<Duration>, mut job: F) -> Option<JoinHandle<()>>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let interval = interval?;
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            job().await;
        }
    }))
}

/// Owns the auto-refresh loop so a settings change can restart it
#[derive(Debug, Default)]
pub struct AutoRefresh {
    handle: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running loop and start a new one with `interval`
    pub fn restart<F, Fut>(&mut self, interval: Option<Duration>, job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        self.handle = spawn_auto_refresh(interval, job);
        if self.handle.is_none() {
            tracing::info!("Auto-refresh disabled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
