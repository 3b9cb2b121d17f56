use tokio_util::sync::CancellationToken;

use crate::{
    errors::ShuffleError,
    management::{BlobStore, QUEUED_TRACKS_KEY, TrackSet, ensure_active},
};

/// Reads and writes the record of tracks this tool has already queued.
pub struct QueuedTracksManager<'a> {
    store: &'a dyn BlobStore,
    cancel: CancellationToken,
}

impl<'a> QueuedTracksManager<'a> {
    pub fn new(store: &'a dyn BlobStore, cancel: CancellationToken) -> Self {
        Self { store, cancel }
    }

    /// Loads the queued set. A record that was never written is an empty set.
    pub async fn load(&self) -> Result<TrackSet, ShuffleError> {
        ensure_active(&self.cancel)?;
        let bytes = match self.store.read(QUEUED_TRACKS_KEY).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(TrackSet::new()),
            Err(source) => {
                return Err(ShuffleError::Load {
                    key: QUEUED_TRACKS_KEY.to_string(),
                    source,
                });
            }
        };

        TrackSet::from_bytes(&bytes).map_err(|source| ShuffleError::Decode {
            key: QUEUED_TRACKS_KEY.to_string(),
            source,
        })
    }

    pub async fn persist(&self, queued: &TrackSet) -> Result<(), ShuffleError> {
        let bytes = queued.to_bytes().map_err(|source| ShuffleError::Encode {
            key: QUEUED_TRACKS_KEY.to_string(),
            source,
        })?;

        ensure_active(&self.cancel)?;
        self.store
            .write(QUEUED_TRACKS_KEY, &bytes)
            .await
            .map_err(|source| ShuffleError::Persist {
                key: QUEUED_TRACKS_KEY.to_string(),
                source,
            })
    }

    /// Overwrites the record with an empty set.
    pub async fn purge(&self) -> Result<(), ShuffleError> {
        self.persist(&TrackSet::new()).await
    }
}
