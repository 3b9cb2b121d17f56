use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_LENGTH};
use tokio::time::sleep;

use crate::{
    Res, config,
    types::{LibraryItem, SavedTracksResponse, TrackId},
    warning,
};

/// Requests sent for one call before a `429` or `502` is returned as an error.
pub const MAX_ATTEMPTS: u32 = 3;
/// Longest `Retry-After` that is waited out.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// The two account operations a shuffle run needs.
///
/// Implemented by [`SpotifyClient`] for the real Web API; tests provide
/// in-memory fakes.
#[async_trait]
pub trait LibraryClient: Send + Sync {
    /// Fetches up to `limit` saved tracks starting at the 0-based `offset`.
    async fn fetch_library_page(&self, offset: u32, limit: u32) -> Res<Vec<LibraryItem>>;

    /// Appends a single track to the user's playback queue.
    async fn submit_to_queue(&self, track: &TrackId) -> Res<()>;
}

/// Authenticated Spotify Web API client.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
    bad_gateway_delay: Duration,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_api_url(access_token, config::spotify_apiurl())
    }

    pub fn with_api_url(access_token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            bad_gateway_delay: BAD_GATEWAY_DELAY,
        }
    }

    /// Pause before retrying a `502 Bad Gateway`, ten seconds by default.
    pub fn with_bad_gateway_delay(mut self, delay: Duration) -> Self {
        self.bad_gateway_delay = delay;
        self
    }

    /// Sends the request built by `build`, waiting out `429 Too Many Requests`
    /// (as long as `Retry-After` stays reasonable) and retrying `502 Bad
    /// Gateway` a few times. Any other non-success status is an error.
    async fn send<F>(&self, build: F) -> Res<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            let response = build(&self.http)
                .bearer_auth(&self.access_token)
                .send()
                .await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS if attempt < MAX_ATTEMPTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds.",
                            retry_after
                        );
                        return Ok(response.error_for_status()?);
                    }
                    sleep(Duration::from_secs(retry_after)).await;
                }
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    sleep(self.bad_gateway_delay).await;
                }
                _ => return Ok(response.error_for_status()?),
            }

            attempt += 1;
        }
    }
}

#[async_trait]
impl LibraryClient for SpotifyClient {
    async fn fetch_library_page(&self, offset: u32, limit: u32) -> Res<Vec<LibraryItem>> {
        // `market=from_token` makes the API report `is_playable` per track
        let api_url = format!(
            "{uri}/me/tracks?limit={limit}&offset={offset}&market=from_token",
            uri = self.api_url,
            limit = limit,
            offset = offset
        );

        let response = self.send(|http| http.get(&api_url)).await?;
        let page = response.json::<SavedTracksResponse>().await?;

        Ok(page.items.into_iter().map(LibraryItem::from).collect())
    }

    async fn submit_to_queue(&self, track: &TrackId) -> Res<()> {
        let api_url = format!("{uri}/me/player/queue", uri = self.api_url);
        let track_uri = track.uri();

        self.send(|http| {
            http.post(&api_url)
                .query(&[("uri", track_uri.as_str())])
                .header(CONTENT_LENGTH, 0)
        })
        .await?;

        Ok(())
    }
}
