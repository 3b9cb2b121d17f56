#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use spotify_shuffler::{
    Res,
    errors::StoreError,
    management::{BlobStore, ObjectStat, TrackSet},
    spotify::LibraryClient,
    types::{LibraryItem, TrackId},
};
use tokio_util::sync::CancellationToken;

pub fn ids(values: &[&str]) -> TrackSet {
    values.iter().map(|v| TrackId::from(*v)).collect()
}

pub fn playable_item(id: &str) -> LibraryItem {
    LibraryItem {
        id: Some(TrackId::from(id)),
        playable: Some(true),
    }
}

/// Library of `count` playable tracks named `t0`, `t1`, ...
pub fn numbered_library(count: usize) -> Vec<LibraryItem> {
    (0..count).map(|i| playable_item(&format!("t{i}"))).collect()
}

// Library client backed by a fixed list of saved tracks.
pub struct FakeClient {
    library: Vec<LibraryItem>,
    page_calls: Mutex<Vec<u32>>,
    submit_attempts: Mutex<usize>,
    submitted: Mutex<Vec<TrackId>>,
    fail_page_at: Option<u32>,
    fail_submit_at: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeClient {
    pub fn new(library: Vec<LibraryItem>) -> Self {
        Self {
            library,
            page_calls: Mutex::new(Vec::new()),
            submit_attempts: Mutex::new(0),
            submitted: Mutex::new(Vec::new()),
            fail_page_at: None,
            fail_submit_at: None,
            cancel_after: None,
        }
    }

    pub fn with_playable(values: &[&str]) -> Self {
        Self::new(values.iter().map(|v| playable_item(v)).collect())
    }

    pub fn failing_page_at(mut self, offset: u32) -> Self {
        self.fail_page_at = Some(offset);
        self
    }

    /// Fails the submission at the 1-based `position`.
    pub fn failing_submit_at(mut self, position: usize) -> Self {
        self.fail_submit_at = Some(position);
        self
    }

    /// Cancels `token` once `count` submissions went through.
    pub fn cancelling_after(mut self, count: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((count, token));
        self
    }

    pub fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<TrackId> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submit_attempts(&self) -> usize {
        *self.submit_attempts.lock().unwrap()
    }
}

#[async_trait]
impl LibraryClient for FakeClient {
    async fn fetch_library_page(&self, offset: u32, limit: u32) -> Res<Vec<LibraryItem>> {
        self.page_calls.lock().unwrap().push(offset);
        if self.fail_page_at == Some(offset) {
            return Err("service unavailable".into());
        }

        let start = (offset as usize).min(self.library.len());
        let end = (start + limit as usize).min(self.library.len());
        Ok(self.library[start..end].to_vec())
    }

    async fn submit_to_queue(&self, track: &TrackId) -> Res<()> {
        let attempt = {
            let mut attempts = self.submit_attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if self.fail_submit_at == Some(attempt) {
            return Err("no active device".into());
        }

        let submitted = {
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(track.clone());
            submitted.len()
        };
        if let Some((count, token)) = &self.cancel_after {
            if submitted == *count {
                token.cancel();
            }
        }
        Ok(())
    }
}

// Blob store keeping objects in memory with an adjustable modification time.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
    writes: Mutex<Vec<String>>,
    failing_writes: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `set` under `key` as if it had been written `age` ago.
    pub fn put(&self, key: &str, set: &TrackSet, age: TimeDelta) {
        let bytes = set.to_bytes().unwrap();
        self.put_raw(key, &bytes, age);
    }

    pub fn put_raw(&self, key: &str, bytes: &[u8], age: TimeDelta) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes.to_vec(), Utc::now() - age));
    }

    pub fn get(&self, key: &str) -> Option<TrackSet> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| TrackSet::from_bytes(bytes).unwrap())
    }

    /// Keys in the order they were written through the store interface.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn stat(&self, key: &str) -> Result<ObjectStat, StoreError> {
        Ok(match self.objects.lock().unwrap().get(key) {
            Some((_, modified)) => ObjectStat {
                exists: true,
                last_modified: Some(*modified),
            },
            None => ObjectStat::missing(),
        })
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if self.failing_writes.lock().unwrap().contains(key) {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("bucket is read-only"),
            });
        }

        self.writes.lock().unwrap().push(key.to_string());
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes.to_vec(), Utc::now()));
        Ok(())
    }
}
