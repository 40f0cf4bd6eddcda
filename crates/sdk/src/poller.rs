/// Periodic refresh of lendgine snapshots

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info};

use lendgine_types::{Lendgine, LendgineInfo};

use crate::client::LendgineClient;

/// Refetches a fixed set of lendgines every interval and publishes the
/// latest snapshots. `None` until the first refresh succeeds.
pub struct LendginePoller {
    client: Arc<LendgineClient>,
    lendgines: Vec<Lendgine>,
    interval: Duration,
    latest: watch::Sender<Option<Vec<LendgineInfo>>>,
}

impl LendginePoller {
    pub fn new(client: Arc<LendgineClient>, lendgines: Vec<Lendgine>, interval: Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            client,
            lendgines,
            interval,
            latest,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<LendgineInfo>>> {
        self.latest.subscribe()
    }

    /// Poll until `shutdown` flips to true; returns the number of iterations
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!(
            lendgines = self.lendgines.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting lendgine poller"
        );

        let mut interval_timer = time::interval(self.interval);
        let mut iteration = 0u64;

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }
            iteration += 1;
            debug!(iteration, "Refreshing lendgine snapshots");

            match self.client.refresh(&self.lendgines).await {
                Ok(infos) => {
                    self.latest.send_replace(Some(infos));
                }
                Err(e) => {
                    // keep the last good snapshots
                    error!(iteration, error = %e, "Failed to refresh lendgine snapshots");
                }
            }
        }

        info!(iterations = iteration, "Lendgine poller stopped");
        iteration
    }
}
