//! Periodic checkpoint refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::controller::Controller;

/// Default time between refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Spawn a task that calls [`Controller::refresh_checkpoint`] every
/// `period`, starting one period from now, until `shutdown_rx` changes.
///
/// A refresh already in progress when shutdown arrives runs to completion.
pub fn spawn_refresher(
    controller: Arc<Controller>,
    period: Duration,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run(controller, period, shutdown_rx))
}

async fn run(controller: Arc<Controller>, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    info!(period_ms = period.as_millis() as u64, "refresher started");

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                controller.refresh_checkpoint().await;
            }
            _ = shutdown_rx.changed() => {
                info!("refresher shutting down");
                break;
            }
        }
    }

    info!("refresher stopped");
}
