//! Background job watching
//!
//! Triggering a crawl or summary run on the curation backend starts a
//! bounded status poll: one check every two seconds, capped at 150
//! attempts (about five minutes). When the job reports not-running the
//! view snapshot is reloaded. Each watcher owns a cancellation token so a
//! re-trigger or shutdown stops the loop cleanly instead of leaking it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::admin::client::{AdminClient, JobKind};
use crate::loader::DataRoot;
use crate::state::{ViewEvent, ViewState};

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const POLL_MAX_ATTEMPTS: u32 = 150;

#[derive(Debug)]
struct Watcher {
    generation: u64,
    token: CancellationToken,
}

/// Tracks one watcher per job kind
#[derive(Debug, Default)]
pub struct JobMonitor {
    watchers: Mutex<HashMap<JobKind, Watcher>>,
    next_generation: Mutex<u64>,
}

impl JobMonitor {
    /// Start watching a job, cancelling any previous watcher for the same
    /// kind
    pub fn watch(
        self: Arc<Self>,
        client: AdminClient,
        data: DataRoot,
        view: Arc<RwLock<ViewState>>,
        kind: JobKind,
    ) {
        let token = CancellationToken::new();
        let generation = self.bump_generation();

        if let Ok(mut watchers) = self.watchers.lock() {
            if let Some(previous) = watchers.insert(
                kind,
                Watcher {
                    generation,
                    token: token.clone(),
                },
            ) {
                previous.token.cancel();
            }
        }

        let monitor = Arc::clone(&self);
        tokio::spawn(async move {
            poll_until_idle(&client, &data, &view, kind, &token).await;
            monitor.clear(kind, generation);
        });
    }

    /// Stop watching a job; returns whether a watcher was active
    pub fn cancel(&self, kind: JobKind) -> bool {
        match self.watchers.lock() {
            Ok(mut watchers) => match watchers.remove(&kind) {
                Some(watcher) => {
                    watcher.token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Cancel every active watcher (shutdown path)
    pub fn cancel_all(&self) {
        if let Ok(mut watchers) = self.watchers.lock() {
            for (_, watcher) in watchers.drain() {
                watcher.token.cancel();
            }
        }
    }

    pub fn is_watching(&self, kind: JobKind) -> bool {
        self.watchers
            .lock()
            .map(|watchers| watchers.contains_key(&kind))
            .unwrap_or(false)
    }

    fn bump_generation(&self) -> u64 {
        match self.next_generation.lock() {
            Ok(mut counter) => {
                *counter += 1;
                *counter
            }
            Err(_) => 0,
        }
    }

    /// Drop the finished watcher's entry unless a re-trigger replaced it
    fn clear(&self, kind: JobKind, generation: u64) {
        if let Ok(mut watchers) = self.watchers.lock() {
            if watchers
                .get(&kind)
                .is_some_and(|watcher| watcher.generation == generation)
            {
                watchers.remove(&kind);
            }
        }
    }
}

/// Poll job status until the job reports not-running, the attempt cap is
/// reached, or the token is cancelled. A successful finish reloads the
/// view snapshot.
async fn poll_until_idle(
    client: &AdminClient,
    data: &DataRoot,
    view: &Arc<RwLock<ViewState>>,
    kind: JobKind,
    cancel: &CancellationToken,
) {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    for attempt in 0..POLL_MAX_ATTEMPTS {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(job = kind.as_str(), attempt, "Job watch cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        match client.status().await {
            Ok(status) if !status.is_running(kind) => {
                info!(job = kind.as_str(), attempt, "Job finished, reloading snapshot");
                reload_view(data, view).await;
                return;
            }
            Ok(_) => {}
            Err(error) => {
                // Transient poll errors consume an attempt but do not abort
                // the watch
                warn!(job = kind.as_str(), attempt, %error, "Job status poll failed");
            }
        }
    }

    warn!(
        job = kind.as_str(),
        attempts = POLL_MAX_ATTEMPTS,
        "Job watch gave up before the job reported idle"
    );
}

/// Load a fresh snapshot and apply the outcome as a state transition
pub async fn reload_view(data: &DataRoot, view: &Arc<RwLock<ViewState>>) {
    let event = match data.load().await {
        Ok(loaded) => ViewEvent::LoadSucceeded(loaded),
        Err(error) => {
            warn!(%error, "Snapshot reload failed");
            ViewEvent::LoadFailed(error.to_string())
        }
    };
    if let Ok(mut state) = view.write() {
        state.apply(event);
    }
}
