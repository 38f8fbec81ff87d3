//! Client-side polling loop that mirrors the registry into a local view.
//!
//! One task owns the loop: fetch, record the outcome, wait `poll_interval`
//! (or an explicit refresh), repeat. The next fetch is only scheduled after
//! the previous one resolved, so fetches never overlap. A slow server
//! stretches the effective period instead.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use ferrocam_model::Camera;
use tokio::{
    sync::{Notify, watch},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{error::Result, feed::CameraFeed};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Delay between the end of one fetch and the start of the next.
    pub poll_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The local mirror plus the network-error flag.
#[derive(Debug)]
pub struct SyncState {
    snapshot: watch::Sender<Vec<Camera>>,
    net_error: AtomicBool,
    completed_polls: AtomicU64,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncState {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            snapshot,
            net_error: AtomicBool::new(false),
            completed_polls: AtomicU64::new(0),
        }
    }

    /// Current mirrored cameras.
    pub fn cameras(&self) -> Vec<Camera> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified after every successful reconcile.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Camera>> {
        self.snapshot.subscribe()
    }

    /// True once any poll has failed. A later success does not reset it.
    pub fn has_error(&self) -> bool {
        self.net_error.load(Ordering::Acquire)
    }

    /// Acknowledge a reported network failure.
    pub fn clear_error(&self) {
        self.net_error.store(false, Ordering::Release);
    }

    /// Number of fetches that have resolved, successfully or not.
    pub fn completed_polls(&self) -> u64 {
        self.completed_polls.load(Ordering::Acquire)
    }

    /// Overwrite the mirror with a server snapshot, element by element,
    /// truncating or extending to the server's count.
    pub fn reconcile(&self, incoming: Vec<Camera>) {
        self.snapshot.send_modify(|local| {
            local.truncate(incoming.len());
            for (position, camera) in incoming.into_iter().enumerate() {
                match local.get_mut(position) {
                    Some(slot) => *slot = camera,
                    None => local.push(camera),
                }
            }
        });
    }

    fn record(&self, outcome: Result<Vec<Camera>>) {
        match outcome {
            Ok(cameras) => {
                debug!(count = cameras.len(), "camera poll succeeded");
                self.reconcile(cameras);
            }
            Err(err) => {
                warn!(error = %err, "camera poll failed");
                self.net_error.store(true, Ordering::Release);
            }
        }
        self.completed_polls.fetch_add(1, Ordering::AcqRel);
    }
}

/// Entry point for starting the polling loop.
#[derive(Debug)]
pub struct Synchronizer;

impl Synchronizer {
    /// Spawn the polling task. The first fetch is issued immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(feed: F, options: SyncOptions) -> SyncHandle
    where
        F: CameraFeed + 'static,
    {
        let state = Arc::new(SyncState::new());
        let cancel = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        let task = tokio::spawn(sync_loop(
            feed,
            options.poll_interval,
            Arc::clone(&state),
            cancel.clone(),
            Arc::clone(&refresh),
        ));

        SyncHandle {
            state,
            cancel,
            refresh,
            task: Some(task),
        }
    }
}

/// Owner handle of a running synchronizer. Dropping it stops the loop.
#[derive(Debug)]
pub struct SyncHandle {
    state: Arc<SyncState>,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn state(&self) -> &Arc<SyncState> {
        &self.state
    }

    /// Fetch as soon as possible instead of waiting out the interval. If a
    /// fetch is in flight the refresh runs right after it.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop and wait for the task to exit. An in-flight fetch is
    /// abandoned.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "synchronizer task ended abnormally");
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn sync_loop<F: CameraFeed>(
    feed: F,
    poll_interval: Duration,
    state: Arc<SyncState>,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
) {
    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = feed.fetch_cameras() => outcome,
        };
        state.record(outcome);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = refresh.notified() => debug!("refresh requested"),
            _ = time::sleep(poll_interval) => {}
        }
    }
    debug!("synchronizer stopped");
}
