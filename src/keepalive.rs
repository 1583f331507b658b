//! Liveness pinger.
//!
//! Some hosting platforms suspend a service that receives no traffic for a
//! while. The pinger calls the service's own public root URL on a fixed
//! interval for as long as the process runs.

use crate::{Error, Result, config::KeepAliveConfig};
use reqwest::StatusCode;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::{sync::oneshot, task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingSchedule {
    pub url: String,
    pub initial_delay: Duration,
    pub interval: Duration,
    pub timeout: Duration,
}

impl PingSchedule {
    /// Returns `None` when no public URL is configured.
    pub fn from_config(config: &KeepAliveConfig) -> Option<Self> {
        let url = config.url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }

        Some(Self {
            url: url.to_string(),
            initial_delay: config.initial_delay(),
            interval: config.interval(),
            timeout: config.timeout(),
        })
    }
}

#[derive(Debug, Default)]
pub struct PingStats {
    attempts: AtomicU64,
    failures: AtomicU64,
}

impl PingStats {
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Handle to the running pinger task.
///
/// Dropping the handle also stops the task, since the stop channel closes.
pub struct KeepAlive {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
    stats: Arc<PingStats>,
}

impl KeepAlive {
    pub fn spawn(schedule: PingSchedule) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(schedule.timeout)
            .build()?;

        let (stop, stop_rx) = oneshot::channel();
        let stats = Arc::new(PingStats::default());

        info!(
            "Starting liveness pinger for {} every {:?} (first ping in {:?})",
            schedule.url, schedule.interval, schedule.initial_delay
        );

        let handle = tokio::spawn(run_loop(client, schedule, stats.clone(), stop_rx));

        Ok(Self {
            stop,
            handle,
            stats,
        })
    }

    pub fn stats(&self) -> &PingStats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the loop and waits for the task to finish.
    pub async fn shutdown(self) {
        // The task may already be gone, in which case the receiver is dropped.
        let _ = self.stop.send(());

        if let Err(e) = self.handle.await {
            warn!("Liveness pinger task ended abnormally: {}", e);
        }
        info!("Liveness pinger stopped");
    }
}

/// Sends one `GET` to `url`. Any non-success status is a `Ping` error.
pub async fn ping_once(client: &reqwest::Client, url: &str) -> Result<StatusCode> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::ping(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::ping(format!("{} answered with {}", url, status)));
    }
    Ok(status)
}

async fn run_loop(
    client: reqwest::Client,
    schedule: PingSchedule,
    stats: Arc<PingStats>,
    mut stop: oneshot::Receiver<()>,
) {
    tokio::select! {
        _ = &mut stop => return,
        _ = sleep(schedule.initial_delay) => {}
    }

    loop {
        stats.attempts.fetch_add(1, Ordering::Relaxed);

        tokio::select! {
            _ = &mut stop => break,
            result = ping_once(&client, &schedule.url) => match result {
                Ok(status) => info!("Keepalive ping to {}: {}", schedule.url, status),
                Err(e) => {
                    stats.failures.fetch_add(1, Ordering::Relaxed);
                    warn!("Keepalive ping failed: {}", e);
                }
            }
        }

        tokio::select! {
            _ = &mut stop => break,
            _ = sleep(schedule.interval) => {}
        }
    }

    debug!("Liveness pinger loop exited");
}
