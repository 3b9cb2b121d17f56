use std::time::Duration;

use chrono::{TimeDelta, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::{
    errors::ShuffleError,
    info,
    management::{BlobStore, ObjectStat, PLAYABLE_TRACKS_KEY, TrackSet, ensure_active},
    spotify::LibraryClient,
};

/// Number of saved tracks requested per library page.
pub const PAGE_SIZE: u32 = 50;

/// How long a cached snapshot of the playable tracks stays valid.
pub const CACHE_TTL: TimeDelta = TimeDelta::hours(24);

/// Builds the set of playable library tracks, caching it in the blob store.
pub struct PlayableTracksManager<'a> {
    client: &'a dyn LibraryClient,
    store: &'a dyn BlobStore,
    cancel: CancellationToken,
}

impl<'a> PlayableTracksManager<'a> {
    pub fn new(
        client: &'a dyn LibraryClient,
        store: &'a dyn BlobStore,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            store,
            cancel,
        }
    }

    /// Returns every currently playable track in the user's library.
    ///
    /// A cached snapshot younger than [`CACHE_TTL`] is returned as-is without
    /// touching the Spotify API. A missing or stale snapshot, or
    /// `force_refresh`, rebuilds the whole set from the live library and
    /// writes it back to the cache before returning it.
    ///
    /// # Errors
    ///
    /// - [`ShuffleError::Fetch`] when a library page cannot be fetched
    /// - [`ShuffleError::Persist`] when the fresh snapshot cannot be written
    /// - [`ShuffleError::Load`] / [`ShuffleError::Decode`] for an unreadable cache
    /// - [`ShuffleError::Cancelled`] when the run is interrupted
    pub async fn get_all_playable_tracks(
        &self,
        force_refresh: bool,
    ) -> Result<TrackSet, ShuffleError> {
        ensure_active(&self.cancel)?;
        let stat = self
            .store
            .stat(PLAYABLE_TRACKS_KEY)
            .await
            .map_err(|source| ShuffleError::Load {
                key: PLAYABLE_TRACKS_KEY.to_string(),
                source,
            })?;

        if !force_refresh && is_fresh(&stat) {
            if let Some(cached) = self.load_cached().await? {
                return Ok(cached);
            }
        }

        info!("Refreshing playable tracks from Spotify...");
        let playable = self.list_all_playable_tracks().await?;
        self.persist(&playable).await?;

        Ok(playable)
    }

    /// Pages through the saved tracks, keeping the explicitly playable ones.
    ///
    /// Stops at the first page shorter than [`PAGE_SIZE`]; when the library
    /// size is a multiple of the page size that is the empty page after it.
    pub async fn list_all_playable_tracks(&self) -> Result<TrackSet, ShuffleError> {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        let mut playable = TrackSet::new();
        let mut offset: u32 = 0;

        loop {
            pb.set_message(format!(
                "Fetching tracks from {} to {}...",
                offset + 1,
                offset + PAGE_SIZE
            ));

            if let Err(e) = ensure_active(&self.cancel) {
                pb.finish_and_clear();
                return Err(e);
            }

            let page = match self.client.fetch_library_page(offset, PAGE_SIZE).await {
                Ok(page) => page,
                Err(source) => {
                    pb.finish_and_clear();
                    return Err(ShuffleError::Fetch { offset, source });
                }
            };

            for item in &page {
                if let Some(id) = item.playable_id() {
                    playable.insert(id.clone());
                }
            }

            if page.len() < PAGE_SIZE as usize {
                break;
            }
            offset += PAGE_SIZE;
        }

        pb.finish_and_clear();
        Ok(playable)
    }

    async fn load_cached(&self) -> Result<Option<TrackSet>, ShuffleError> {
        ensure_active(&self.cancel)?;
        let bytes = match self.store.read(PLAYABLE_TRACKS_KEY).await {
            Ok(bytes) => bytes,
            // removed between stat and read: rebuild instead
            Err(e) if e.is_not_found() => return Ok(None),
            Err(source) => {
                return Err(ShuffleError::Load {
                    key: PLAYABLE_TRACKS_KEY.to_string(),
                    source,
                });
            }
        };

        TrackSet::from_bytes(&bytes)
            .map(Some)
            .map_err(|source| ShuffleError::Decode {
                key: PLAYABLE_TRACKS_KEY.to_string(),
                source,
            })
    }

    async fn persist(&self, playable: &TrackSet) -> Result<(), ShuffleError> {
        let bytes = playable.to_bytes().map_err(|source| ShuffleError::Encode {
            key: PLAYABLE_TRACKS_KEY.to_string(),
            source,
        })?;

        ensure_active(&self.cancel)?;
        self.store
            .write(PLAYABLE_TRACKS_KEY, &bytes)
            .await
            .map_err(|source| ShuffleError::Persist {
                key: PLAYABLE_TRACKS_KEY.to_string(),
                source,
            })
    }
}

fn is_fresh(stat: &ObjectStat) -> bool {
    match (stat.exists, stat.last_modified) {
        (true, Some(last_modified)) => Utc::now() - last_modified < CACHE_TTL,
        _ => false,
    }
}
