//! [`AlertScheduler`]: Drives [`AlertService::tick`] on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use vigil_core::traits::{Cancellable, CancellationToken};
use vigil_core::VigilConfig;

use crate::service::AlertService;

/// Periodic evaluation loop, independent of request handling.
///
/// Each tick runs on the blocking pool since evaluation fans out over rayon
/// and takes blocking locks. A panicking tick is logged and the loop goes on.
pub struct AlertScheduler {
    service: Arc<AlertService>,
    interval: Duration,
    token: CancellationToken,
    wake: Arc<Notify>,
}

impl AlertScheduler {
    pub fn new(service: Arc<AlertService>, interval: Duration) -> Self {
        Self {
            service,
            interval: interval.max(Duration::from_millis(1)),
            token: CancellationToken::new(),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Scheduler using `[evaluation] interval_ms`.
    pub fn from_config(service: Arc<AlertService>, config: &VigilConfig) -> Self {
        Self::new(service, config.evaluation.effective_interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Token observed by the loop; cancelling it ends the loop after the
    /// current tick.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel and wake the loop so it exits without waiting for the next tick.
    pub fn stop(&self) {
        self.token.cancel();
        self.wake.notify_one();
    }

    /// Run the loop on the current tokio runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Tick until cancelled. The first tick happens immediately.
    pub async fn run(&self) {
        info!(interval_ms = self.interval.as_millis() as u64, "alert scheduler started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.wake.notified() => {}
            }
            if self.token.is_cancelled() {
                break;
            }

            let service = Arc::clone(&self.service);
            match tokio::task::spawn_blocking(move || service.tick_now()).await {
                Ok(_) => {}
                Err(e) if e.is_panic() => error!(error = ?e, "evaluation tick panicked"),
                Err(e) => error!(error = ?e, "evaluation tick was cancelled"),
            }
        }
        info!("alert scheduler stopped");
    }
}
