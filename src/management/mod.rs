//! Persistent track records.
//!
//! Two blobs survive between runs: `playableTracks`, a snapshot of the
//! playable library that is rebuilt once it is older than a day, and
//! `queuedTracks`, every track this tool has pushed to the playback queue
//! since the last reset.

use tokio_util::sync::CancellationToken;

use crate::errors::ShuffleError;

mod playable;
mod queued;
mod store;
mod track_set;

pub use playable::{CACHE_TTL, PAGE_SIZE, PlayableTracksManager};
pub use queued::QueuedTracksManager;
pub use store::{BlobStore, FsBlobStore, ObjectBlobStore, ObjectStat};
pub use track_set::TrackSet;

pub const PLAYABLE_TRACKS_KEY: &str = "playableTracks";
pub const QUEUED_TRACKS_KEY: &str = "queuedTracks";

/// Fails with [`ShuffleError::Cancelled`] once the run has been interrupted.
pub fn ensure_active(cancel: &CancellationToken) -> Result<(), ShuffleError> {
    if cancel.is_cancelled() {
        return Err(ShuffleError::Cancelled);
    }
    Ok(())
}
