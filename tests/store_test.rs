mod common;

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use common::{FakeClient, ids};
use object_store::memory::InMemory;
use spotify_shuffler::{
    errors::StoreError,
    management::{
        BlobStore, FsBlobStore, ObjectBlobStore, ObjectStat, PLAYABLE_TRACKS_KEY,
        PlayableTracksManager,
    },
};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_stat_missing_object() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    let stat = store.stat("playableTracks").await.unwrap();

    assert!(!stat.exists);
    assert!(stat.last_modified.is_none());
}

#[tokio::test]
async fn test_read_missing_object_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    let err = store.read("queuedTracks").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, StoreError::NotFound(key) if key == "queuedTracks"));
}

#[tokio::test]
async fn test_write_then_read_and_stat() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(dir.path().join("nested").join("store"));

    store.write("queuedTracks", br#"{"ids":{}}"#).await.unwrap();

    assert_eq!(store.read("queuedTracks").await.unwrap(), br#"{"ids":{}}"#);

    let stat = store.stat("queuedTracks").await.unwrap();
    assert!(stat.exists);
    let age = Utc::now() - stat.last_modified.unwrap();
    assert!(age < TimeDelta::minutes(1));
}

#[tokio::test]
async fn test_write_replaces_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    store.write("playableTracks", b"first").await.unwrap();
    store.write("playableTracks", b"second").await.unwrap();

    assert_eq!(store.read("playableTracks").await.unwrap(), b"second");
    // only the object itself is left behind
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(dir.path());

    store.write("playableTracks", b"a").await.unwrap();

    assert!(store.read("queuedTracks").await.unwrap_err().is_not_found());
    assert_eq!(store.read("playableTracks").await.unwrap(), b"a");
}

fn memory_bucket() -> ObjectBlobStore {
    ObjectBlobStore::new(Arc::new(InMemory::new()))
}

#[tokio::test]
async fn test_bucket_stat_missing_object() {
    let store = memory_bucket();

    let stat = store.stat("playableTracks").await.unwrap();

    assert_eq!(stat, ObjectStat::missing());
}

#[tokio::test]
async fn test_bucket_read_missing_object_is_not_found() {
    let store = memory_bucket();

    let err = store.read("queuedTracks").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, StoreError::NotFound(key) if key == "queuedTracks"));
}

#[tokio::test]
async fn test_bucket_write_then_read_and_stat() {
    let store = memory_bucket();

    store.write("queuedTracks", br#"{"ids":{"a":{}}}"#).await.unwrap();
    store.write("queuedTracks", br#"{"ids":{"b":{}}}"#).await.unwrap();

    assert_eq!(
        store.read("queuedTracks").await.unwrap(),
        br#"{"ids":{"b":{}}}"#
    );
    let stat = store.stat("queuedTracks").await.unwrap();
    assert!(stat.exists);
    let age = Utc::now() - stat.last_modified.unwrap();
    assert!(age < TimeDelta::minutes(1));
    assert!(store.read("playableTracks").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_bucket_backs_the_playable_cache() {
    let store = memory_bucket();
    let playable = ids(&["a", "b"]);
    store
        .write(PLAYABLE_TRACKS_KEY, &playable.to_bytes().unwrap())
        .await
        .unwrap();
    let client = FakeClient::with_playable(&["live"]);

    let loaded = PlayableTracksManager::new(&client, &store, CancellationToken::new())
        .get_all_playable_tracks(false)
        .await
        .unwrap();

    assert_eq!(loaded, playable);
    assert!(client.page_calls().is_empty());
}
