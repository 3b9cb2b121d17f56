use crate::types::TrackId;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures reported by a [`BlobStore`](crate::management::BlobStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {0} not found")]
    NotFound(String),
    #[error("i/o error on object {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("object storage error on {key}: {source}")]
    Remote {
        key: String,
        #[source]
        source: object_store::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Everything that can abort a shuffle run.
///
/// Each variant names the operation that failed and the offset, key or track
/// involved. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum ShuffleError {
    #[error("failed to get current user's tracks, offset {offset}: {source}")]
    Fetch {
        offset: u32,
        #[source]
        source: BoxError,
    },
    #[error("failed to persist {key}: {source}")]
    Persist {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to load {key}: {source}")]
    Load {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to enqueue track {track} ({position} of the batch): {source}")]
    Submit {
        track: TrackId,
        position: usize,
        #[source]
        source: BoxError,
    },
    #[error("cannot select {requested} tracks: the library has no playable tracks")]
    Selection { requested: usize },
    #[error("run cancelled")]
    Cancelled,
}
