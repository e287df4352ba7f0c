//! The control loop's dispatch, driven with explicit clock values.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use reposter::testing::{
    image_candidate, MockCaptionModel, MockContentSource, MockDownloader, MockPublisher,
};
use reposter::{CaptionRewriter, Harvester, PostStore, Publisher, Schedule, Scheduler, Task};
use reposter_common::HarvestMode;

struct Harness {
    _dir: tempfile::TempDir,
    store: PostStore,
    source: Arc<MockContentSource>,
    social: Arc<MockPublisher>,
    scheduler: Scheduler,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn harness() -> Harness {
    harness_at(start())
}

fn harness_at(now: DateTime<Utc>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(MockContentSource::new().on_source(
        "Aww",
        vec![image_candidate("p1", "Aww"), image_candidate("p2", "Aww")],
    ));
    let social = Arc::new(MockPublisher::new());

    let harvester = Harvester::new(
        source.clone(),
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );
    let publisher = Publisher::new(
        store.clone(),
        CaptionRewriter::new(Arc::new(MockCaptionModel::replying("caption"))),
        social.clone(),
    );
    let schedule = Schedule::new(
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        Duration::minutes(60),
        now,
    );
    let scheduler = Scheduler::new(harvester, publisher, vec!["Aww".into()], 10, schedule);

    Harness {
        _dir: dir,
        store,
        source,
        social,
        scheduler,
    }
}

#[tokio::test]
async fn nothing_runs_before_first_interval() {
    let mut h = harness();
    let ran = h
        .scheduler
        .run_pending(start() + Duration::minutes(59))
        .await
        .unwrap();
    assert!(ran.is_empty());
    assert!(h.source.requests().is_empty());
}

#[tokio::test]
async fn publish_runs_once_per_interval() {
    let mut h = harness();
    let ran = h.scheduler.run_pending(start() + Duration::hours(1)).await.unwrap();
    assert_eq!(ran, vec![Task::Publish]);
    assert!(h.social.posts().is_empty(), "store is empty before the first harvest");

    // Publish (due 14:00) is older than the midnight harvest, so it goes first.
    let midnight = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
    let ran = h.scheduler.run_pending(midnight).await.unwrap();
    assert_eq!(ran, vec![Task::Publish, Task::Harvest]);
    assert!(h.social.posts().is_empty());

    let ran = h
        .scheduler
        .run_pending(midnight + Duration::minutes(59))
        .await
        .unwrap();
    assert!(ran.is_empty());

    let ran = h.scheduler.run_pending(midnight + Duration::hours(1)).await.unwrap();
    assert_eq!(ran, vec![Task::Publish]);
    assert_eq!(h.social.posts().len(), 1);

    let records = h.store.load().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records.iter().filter(|r| r.published).count(), 1);
}

#[tokio::test]
async fn due_tasks_run_sequentially_and_reschedule() {
    let mut h = harness();
    let late = Utc.with_ymd_and_hms(2024, 5, 2, 0, 30, 0).unwrap();

    // Publish was due at 13:00 on the first day, harvest at midnight.
    let ran = h.scheduler.run_pending(late).await.unwrap();
    assert_eq!(ran, vec![Task::Publish, Task::Harvest]);
    assert_eq!(h.source.requests().len(), 1);

    let schedule = h.scheduler.schedule();
    assert_eq!(schedule.next_run(Task::Publish), late + Duration::hours(1));
    assert_eq!(
        schedule.next_run(Task::Harvest),
        Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn corrupt_store_stops_the_loop() {
    let mut h = harness();
    std::fs::write(h.store.path(), b"{").unwrap();

    let result = h.scheduler.run_pending(start() + Duration::hours(1)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn run_harvests_on_startup_before_any_publish() {
    let h = harness_at(Utc::now());
    let scheduler = h.scheduler.with_tick(StdDuration::from_millis(10));

    let stopped = tokio::time::timeout(StdDuration::from_millis(500), scheduler.run()).await;
    assert!(stopped.is_err(), "run only returns on a store failure");

    assert_eq!(h.source.requests(), vec![("Aww".to_string(), 10)]);
    let records = h.store.load().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.published));
    assert!(h.social.posts().is_empty());
}
