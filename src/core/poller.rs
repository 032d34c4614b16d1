use crate::core::api::ApiClient;
use crate::models::{Miner, MINER_LIST};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Last miner list fetched from the pool coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct MinerPoolSnapshot {
    pub miners: Vec<Miner>,
    pub difficulty: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Owns the periodic miner-pool refresh. At most one refresh task runs;
/// starting again replaces the previous one.
pub struct MinerPoolPoller {
    api: ApiClient,
    snapshot: Arc<RwLock<Option<MinerPoolSnapshot>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MinerPoolPoller {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            snapshot: Arc::new(RwLock::new(None)),
            task: Mutex::new(None),
        }
    }

    pub fn start(&self, period: Duration) {
        self.stop();

        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match fetch(&api).await {
                    Ok(fresh) => *snapshot.write().await = Some(fresh),
                    Err(e) => error!(
                        event = "miner_refresh_error",
                        message = "Error refreshing miner pool",
                        error = %e
                    ),
                }
            }
        });

        info!(
            event = "miner_poller_started",
            message = "Miner pool refresh scheduled",
            period_secs = period.as_secs()
        );
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
            info!(event = "miner_poller_stopped", message = "Miner pool refresh cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn snapshot(&self) -> Option<MinerPoolSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Fetches now and stores the result, regardless of the schedule.
    pub async fn refresh(&self) -> Result<MinerPoolSnapshot> {
        let fresh = fetch(&self.api).await?;
        *self.snapshot.write().await = Some(fresh.clone());
        Ok(fresh)
    }

    /// Refreshes the scheduled snapshot after a pool change. Without polling
    /// the next `current()` fetches anyway, so nothing is requested.
    pub async fn refresh_if_running(&self) -> Result<Option<MinerPoolSnapshot>> {
        if !self.is_running() {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    /// The scheduled snapshot when polling is on, otherwise a fresh fetch.
    pub async fn current(&self) -> Result<MinerPoolSnapshot> {
        if self.is_running() {
            if let Some(snapshot) = self.snapshot().await {
                return Ok(snapshot);
            }
        }
        self.refresh().await
    }
}

impl Drop for MinerPoolPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch(api: &ApiClient) -> Result<MinerPoolSnapshot> {
    let (miners, difficulty) = tokio::join!(api.miners(), api.difficulty());
    let miners = miners?.into_items(MINER_LIST);

    let difficulty = match difficulty {
        Ok(difficulty) => Some(difficulty),
        Err(e) => {
            warn!(
                event = "difficulty_fetch_error",
                message = "Error fetching current difficulty",
                error = %e
            );
            None
        }
    };

    Ok(MinerPoolSnapshot {
        miners,
        difficulty,
        fetched_at: Utc::now(),
    })
}
