use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};

use crate::config::Credentials;

/// Identifier of a single track in the Spotify catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `spotify:track:<id>` form expected by the queue endpoint.
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One entry of a saved-tracks page as seen by the shuffler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    pub id: Option<TrackId>,
    pub playable: Option<bool>,
}

impl LibraryItem {
    /// Only items with an id whose playability is explicitly `true` count.
    pub fn playable_id(&self) -> Option<&TrackId> {
        match (self.playable, &self.id) {
            (Some(true), Some(id)) => Some(id),
            _ => None,
        }
    }
}

/// Access token returned by the token endpoint. The run never outlives it,
/// so nothing else of the response is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Option<SavedTrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackObject {
    pub id: Option<String>,
    #[serde(default)]
    pub is_playable: Option<bool>,
}

impl From<SavedTrack> for LibraryItem {
    fn from(saved: SavedTrack) -> Self {
        match saved.track {
            Some(track) => LibraryItem {
                id: track.id.map(TrackId::from),
                playable: track.is_playable,
            },
            None => LibraryItem {
                id: None,
                playable: None,
            },
        }
    }
}

/// Shared state between the authorization flow and the callback handler.
///
/// The token sender can be taken exactly once; the first successful exchange
/// completes the flow and every later callback sees it as already done.
pub struct CallbackState {
    pub expected_state: String,
    pub code_verifier: String,
    pub credentials: Credentials,
    sender: Mutex<Option<oneshot::Sender<Token>>>,
}

impl CallbackState {
    pub fn new(
        expected_state: String,
        code_verifier: String,
        credentials: Credentials,
        sender: oneshot::Sender<Token>,
    ) -> Self {
        Self {
            expected_state,
            code_verifier,
            credentials,
            sender: Mutex::new(Some(sender)),
        }
    }

    pub async fn is_completed(&self) -> bool {
        self.sender.lock().await.is_none()
    }

    /// Hands the token to the waiting flow. Returns `false` if it was already
    /// completed or the receiver is gone.
    pub async fn complete(&self, token: Token) -> bool {
        match self.sender.lock().await.take() {
            Some(sender) => sender.send(token).is_ok(),
            None => false,
        }
    }
}
