use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use ferrocam_client::{CameraFeed, ClientError, SyncOptions, Synchronizer};
use ferrocam_model::{Camera, Ident, ImageFormat, Resolution};
use tokio::{sync::Mutex, time};

fn camera(index: u64, name: &str) -> Camera {
    Camera {
        index: Ident::Number(index),
        name: Some(name.to_string()),
        src: format!("https://picsum.photos/640/480?{index}"),
        current_frame_rate: 30.0,
        current_image_format: Ident::Number(1),
        current_image_format_description: Some("RGB 5-6-5 640x480".into()),
        current_quality: Some(85),
        current_resolution: Resolution::new(640, 480),
        image_formats: vec![ImageFormat::new(1u64, "RGB 5-6-5 640x480")],
    }
}

fn fleet(count: u64) -> Vec<Camera> {
    (0..count).map(|i| camera(i, "cam")).collect()
}

fn outage() -> ClientError {
    ClientError::Status {
        status: 503,
        body: "unavailable".into(),
    }
}

/// Scripted feed. Replies are consumed in order; once exhausted it keeps
/// returning a three-camera fleet.
struct FakeFeed {
    latency: Duration,
    replies: Mutex<VecDeque<Result<Vec<Camera>, ClientError>>>,
    fallback: Vec<Camera>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFeed {
    fn new(
        latency: Duration,
        replies: Vec<Result<Vec<Camera>, ClientError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            latency,
            replies: Mutex::new(replies.into()),
            fallback: fleet(3),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraFeed for FakeFeed {
    async fn fetch_cameras(&self) -> ferrocam_client::Result<Vec<Camera>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let next = self.replies.lock().await.pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

fn every_3s() -> SyncOptions {
    SyncOptions::default()
}

#[tokio::test(start_paused = true)]
async fn first_fetch_is_immediate_and_polls_follow_each_completion() {
    let feed = FakeFeed::new(Duration::from_millis(500), vec![]);
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());

    // t=0.1: the initial fetch is already in flight.
    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(feed.calls(), 1);

    // Fetches start at 0, 3.5 and 7.0 (500ms latency + 3s delay each).
    time::sleep(Duration::from_millis(7_100)).await;
    assert_eq!(feed.calls(), 3);
    assert_eq!(handle.state().completed_polls(), 2);
    assert_eq!(feed.max_in_flight(), 1);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failure_sets_the_error_flag_and_polling_continues() {
    let feed = FakeFeed::new(
        Duration::from_millis(10),
        vec![Err(outage()), Ok(fleet(2))],
    );
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());
    let state = Arc::clone(handle.state());

    time::sleep(Duration::from_millis(100)).await;
    assert!(state.has_error());
    assert!(state.cameras().is_empty());

    // The failure still schedules the next poll.
    time::sleep(Duration::from_millis(3_000)).await;
    assert_eq!(feed.calls(), 2);
    assert_eq!(state.cameras().len(), 2);

    // A later success does not clear the flag on its own.
    assert!(state.has_error());
    state.clear_error();
    assert!(!state.has_error());

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn reconcile_truncates_and_extends_to_the_server_count() {
    let feed = FakeFeed::new(
        Duration::from_millis(10),
        vec![Ok(fleet(3)), Ok(fleet(1)), Ok(fleet(2))],
    );
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());
    let mut snapshots = handle.state().subscribe();

    let mut lengths = Vec::new();
    for _ in 0..3 {
        snapshots.changed().await.unwrap();
        lengths.push(snapshots.borrow_and_update().len());
    }
    assert_eq!(lengths, vec![3, 1, 2]);

    let cameras = handle.state().cameras();
    assert_eq!(cameras[1].index, Ident::Number(1));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_ends_polling() {
    let feed = FakeFeed::new(Duration::from_millis(10), vec![]);
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());

    time::sleep(Duration::from_millis(100)).await;
    assert!(handle.is_running());
    handle.stop().await;

    let calls = feed.calls();
    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(feed.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_polling() {
    let feed = FakeFeed::new(Duration::from_millis(10), vec![]);
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());

    time::sleep(Duration::from_millis(100)).await;
    drop(handle);

    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(feed.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn refresh_now_skips_the_remaining_delay() {
    let feed = FakeFeed::new(Duration::from_millis(500), vec![]);
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());

    time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(feed.calls(), 1);

    handle.refresh_now();
    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(feed.calls(), 2);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn refresh_during_a_fetch_waits_for_it() {
    let feed = FakeFeed::new(Duration::from_millis(2_000), vec![]);
    let handle = Synchronizer::start(Arc::clone(&feed), every_3s());

    time::sleep(Duration::from_millis(500)).await;
    handle.refresh_now();

    time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(feed.calls(), 1);

    // First fetch resolves at t=2.0, the queued refresh starts right after.
    time::sleep(Duration::from_millis(600)).await;
    assert_eq!(feed.calls(), 2);
    assert_eq!(feed.max_in_flight(), 1);

    handle.stop().await;
}
