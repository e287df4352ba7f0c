//! Harvest cycles against mocked sources and downloads, persisted to a temp store.

use std::sync::Arc;

use reposter::testing::{image_candidate, record_with_media, MockContentSource, MockDownloader};
use reposter::{Harvester, PostStore};
use reposter_common::{Candidate, HarvestMode};

fn sources(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn text_post(id: &str) -> Candidate {
    Candidate {
        url: Some(format!("https://www.reddit.com/r/Aww/comments/{id}/")),
        is_self: true,
        ..image_candidate(id, "Aww")
    }
}

fn video_post(id: &str) -> Candidate {
    Candidate {
        url: Some(format!("https://v.redd.it/{id}.gif")),
        is_video: true,
        ..image_candidate(id, "Aww")
    }
}

fn link_post(id: &str, url: &str) -> Candidate {
    Candidate {
        url: Some(url.to_string()),
        ..image_candidate(id, "Aww")
    }
}

#[tokio::test]
async fn keeps_only_downloaded_images() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(MockContentSource::new().on_source(
        "Aww",
        vec![
            image_candidate("img", "Aww"),
            text_post("self"),
            video_post("vid"),
            link_post("gifv", "https://i.imgur.com/gifv.gifv"),
            link_post("article", "https://example.com/story"),
            image_candidate("broken", "Aww"),
        ],
    ));
    let downloader = Arc::new(
        MockDownloader::new(dir.path().join("media")).fail_url("https://i.redd.it/broken.jpg"),
    );
    let harvester = Harvester::new(source, downloader.clone(), store.clone(), HarvestMode::Overwrite);

    let report = harvester.harvest(&sources(&["Aww"]), 10).await.unwrap();

    assert_eq!(report.candidates, 6);
    assert_eq!(report.added, 1);
    assert_eq!(
        downloader.fetched(),
        vec!["https://i.redd.it/img.jpg", "https://i.redd.it/broken.jpg"]
    );

    let records = store.load().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, "img");
    assert_eq!(record.source_name, "Aww");
    assert!(!record.published);
    assert!(record.existing_media().is_some());
}

#[tokio::test]
async fn empty_sources_overwrite_store_with_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    store
        .save(&[record_with_media(&dir.path().join("media"), "old")])
        .await
        .unwrap();

    let harvester = Harvester::new(
        Arc::new(MockContentSource::new()),
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );
    let report = harvester.harvest(&sources(&["Aww", "pics"]), 10).await.unwrap();

    assert_eq!(report.added, 0);
    assert!(store.path().exists());
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_source_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(
        MockContentSource::new()
            .failing("down")
            .on_source("pics", vec![image_candidate("p1", "pics")]),
    );
    let harvester = Harvester::new(
        source.clone(),
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );

    let report = harvester
        .harvest(&sources(&["down", "pics"]), 5)
        .await
        .unwrap();

    assert_eq!(report.sources_failed, 1);
    assert_eq!(report.sources_ok, 1);
    assert_eq!(
        source.requests(),
        vec![("down".to_string(), 5), ("pics".to_string(), 5)]
    );
    let ids: Vec<_> = store.load().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["p1"]);
}

#[tokio::test]
async fn records_follow_source_then_listing_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(
        MockContentSource::new()
            .on_source("a", vec![image_candidate("a1", "a"), image_candidate("a2", "a")])
            .on_source("b", vec![image_candidate("b1", "b")]),
    );
    let harvester = Harvester::new(
        source,
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );

    harvester.harvest(&sources(&["b", "a"]), 10).await.unwrap();

    let ids: Vec<_> = store.load().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["b1", "a1", "a2"]);
}

#[tokio::test]
async fn per_source_limit_is_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(MockContentSource::new().on_source(
        "Aww",
        (0..5).map(|i| image_candidate(&format!("p{i}"), "Aww")).collect(),
    ));
    let harvester = Harvester::new(
        source,
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );

    let report = harvester.harvest(&sources(&["Aww"]), 2).await.unwrap();
    assert_eq!(report.added, 2);
}

#[tokio::test]
async fn cross_posted_ids_are_stored_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = PostStore::new(dir.path().join("posts.json"));
    let source = Arc::new(
        MockContentSource::new()
            .on_source("a", vec![image_candidate("dup", "a")])
            .on_source("b", vec![image_candidate("dup", "b")]),
    );
    let harvester = Harvester::new(
        source,
        Arc::new(MockDownloader::new(dir.path().join("media"))),
        store.clone(),
        HarvestMode::Overwrite,
    );

    harvester.harvest(&sources(&["a", "b"]), 10).await.unwrap();

    let records = store.load().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_name, "a");
}

#[tokio::test]
async fn merge_mode_keeps_prior_records_and_skips_known_ids() {
    let dir = tempfile::tempdir().unwrap();
    let media = dir.path().join("media");
    let store = PostStore::new(dir.path().join("posts.json"));
    let mut done = record_with_media(&media, "done");
    done.retire();
    let pending = record_with_media(&media, "pending");
    store.save(&[done.clone(), pending.clone()]).await.unwrap();

    let source = Arc::new(MockContentSource::new().on_source(
        "Aww",
        vec![image_candidate("pending", "Aww"), image_candidate("new", "Aww")],
    ));
    let downloader = Arc::new(MockDownloader::new(&media));
    let harvester = Harvester::new(source, downloader.clone(), store.clone(), HarvestMode::Merge);

    let report = harvester.harvest(&sources(&["Aww"]), 10).await.unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.stored, 3);
    assert_eq!(downloader.fetched(), vec!["https://i.redd.it/new.jpg"]);
    let records = store.load().await.unwrap();
    assert_eq!(records[0], done);
    assert_eq!(records[1], pending);
    assert_eq!(records[2].id, "new");
}
