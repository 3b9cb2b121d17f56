//! Configuration management for the Spotify Shuffler.
//!
//! This module handles loading and accessing configuration values from
//! environment variables, `.env` files and the credentials YAML file. It
//! provides a centralized way to manage the Spotify API credentials, endpoint
//! URLs, the callback listener address and the location of the track store
//! (a local directory or a Google Cloud Storage bucket).
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. The credentials file passed with `--creds-path` (credentials only)
//! 4. Application defaults (where applicable)

use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::Res;

const APP_DIR: &str = "spotify-shuffler";

const DEFAULT_CALLBACK_ADDRESS: &str = "127.0.0.1:31415";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:31415";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

pub const ENV_CLIENT_ID: &str = "SPOTIFY_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_SECRET";

/// Permissions requested during authorization.
pub const SCOPES: &[&str] = &[
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-library-read",
    "user-read-private",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-recently-played",
    "user-top-read",
    "streaming",
];

/// Spotify application credentials.
///
/// Deserialized from the credentials YAML file, whose keys follow the
/// `clientID` / `clientSecret` naming:
///
/// ```yaml
/// clientID: 0123456789abcdef
/// clientSecret: fedcba9876543210
/// ```
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret", default)]
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the application directory if it doesn't exist and loads
/// `spotify-shuffler/.env` from the platform-specific local data directory
/// when the file is present. A missing file is not an error; every setting has
/// either a default or another source.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotify-shuffler/.env`
/// - macOS: `~/Library/Application Support/spotify-shuffler/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-shuffler/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Resolves the Spotify application credentials.
///
/// `SPOTIFY_ID` (and optionally `SPOTIFY_SECRET`) in the environment take
/// precedence. Only when `SPOTIFY_ID` is unset or empty is the YAML file at
/// `path` read.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid credentials YAML, or
/// when the resolved client id is empty.
pub fn load_credentials(path: &Path) -> Res<Credentials> {
    match env::var(ENV_CLIENT_ID) {
        Ok(client_id) if !client_id.trim().is_empty() => {
            return validate(Credentials {
                client_id,
                client_secret: env::var(ENV_CLIENT_SECRET).unwrap_or_default(),
            });
        }
        _ => {}
    }

    read_credentials_file(path)
}

/// Reads and validates the credentials YAML file at `path`, ignoring the
/// environment.
pub fn read_credentials_file(path: &Path) -> Res<Credentials> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading credentials file {}: {}", path.display(), e))?;
    let credentials = parse_credentials(&content)?;
    validate(credentials)
}

/// Parses the credentials YAML document.
pub fn parse_credentials(content: &str) -> Res<Credentials> {
    let credentials: Credentials = serde_yaml::from_str(content)
        .map_err(|e| format!("error unmarshalling credentials: {}", e))?;
    Ok(credentials)
}

fn validate(credentials: Credentials) -> Res<Credentials> {
    if credentials.client_id.trim().is_empty() {
        return Err("client id must not be empty".into());
    }
    Ok(credentials)
}

/// Directory holding the `playableTracks` and `queuedTracks` blobs.
///
/// Overridable with `SHUFFLER_STORE_DIR`; defaults to
/// `<local data dir>/spotify-shuffler/store`.
pub fn store_dir() -> PathBuf {
    match env::var("SHUFFLER_STORE_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => app_dir().join("store"),
    }
}

/// Google Cloud Storage bucket holding the track records, when
/// `SHUFFLER_GCS_BUCKET` is set. Without it the records stay in [`store_dir`].
pub fn storage_bucket() -> Option<String> {
    match env::var("SHUFFLER_GCS_BUCKET") {
        Ok(bucket) if !bucket.trim().is_empty() => Some(bucket),
        _ => None,
    }
}

/// Address the local OAuth callback listener binds to.
pub fn callback_addr() -> String {
    env_or("SHUFFLER_CALLBACK_ADDRESS", DEFAULT_CALLBACK_ADDRESS)
}

/// Redirect URI registered with the Spotify application.
pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated scope list for the authorization request.
pub fn spotify_scope() -> String {
    SCOPES.join(" ")
}

pub fn spotify_apiauth_url() -> String {
    env_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    env_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
