//! # Spotify Integration Module
//!
//! The integration layer between the shuffler and the Spotify Web API. It
//! covers the authorization flow and the two account operations a shuffle
//! run needs.
//!
//! ## Architecture
//!
//! ```text
//! Reconciler / Library fetcher
//!          ↓
//! LibraryClient (trait)
//!          ↓
//! SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - OAuth 2.0 authorization-code flow with PKCE:
//! - **Browser Integration**: opens the authorization URL in the default browser
//! - **Local Callback Server**: one-shot listener receiving the authorization code
//! - **Anti-Forgery State**: callbacks with a foreign `state` are rejected
//! - **Token Exchange**: code + verifier + client secret for an access token
//!
//! ### Client Module
//!
//! [`client`] - The [`LibraryClient`] seam and its Web API implementation:
//! - **Saved Tracks**: offset-paged `GET /me/tracks` with playability info
//! - **Playback Queue**: `POST /me/player/queue` for a single track
//! - **Rate Limiting**: waits out `429` responses that carry a sane
//!   `Retry-After`, retries `502 Bad Gateway` a few times
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - Saved tracks, 50 per page, `market=from_token`
//! - `POST /me/player/queue` - Add a track to the active device's queue
//! - `POST /api/token` - Authorization code exchange
//!
//! ## Error Types
//!
//! Functions return [`crate::Res`]; HTTP failures surface as boxed
//! `reqwest::Error`s and are wrapped with context by the caller.

pub mod auth;
pub mod client;

pub use client::{LibraryClient, SpotifyClient};
