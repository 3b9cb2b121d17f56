use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::{
    Res,
    config::{self, Credentials},
    info,
    server::start_callback_server,
    spotify::SpotifyClient,
    types::{CallbackState, Token},
    utils, warning,
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the OAuth authorization-code flow and returns a ready client.
///
/// The flow combines PKCE with the application's client secret:
/// 1. **PKCE Setup**: generates a code verifier and its S256 challenge
/// 2. **State**: generates the anti-forgery `state` value
/// 3. **Server Start**: binds the local callback listener
/// 4. **Browser Launch**: opens the authorization URL, or prints it when no
///    browser can be started
/// 5. **Callback Handling**: the listener exchanges the returned code for a
///    token and hands it over through a oneshot channel, exactly once
/// 6. **Shutdown**: the listener is stopped before the client is returned
///
/// # Errors
///
/// Fails when the callback address is invalid or cannot be bound, when the
/// authorization URL cannot be built, or when the run is cancelled before
/// the browser flow completes.
pub async fn authenticate(
    credentials: &Credentials,
    cancel: &CancellationToken,
) -> Res<SpotifyClient> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let (token_tx, token_rx) = oneshot::channel::<Token>();
    let callback_state = Arc::new(CallbackState::new(
        state.clone(),
        code_verifier,
        credentials.clone(),
        token_tx,
    ));

    let addr = SocketAddr::from_str(&config::callback_addr())
        .map_err(|e| format!("Failed to parse callback address: {}", e))?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = start_callback_server(addr, callback_state, shutdown_rx).await?;

    let auth_url = utils::build_authorize_url(
        &config::spotify_apiauth_url(),
        &credentials.client_id,
        &config::spotify_redirect_uri(),
        &config::spotify_scope(),
        &state,
        &code_challenge,
    )?;

    if webbrowser::open(&auth_url).is_err() {
        info!(
            "Please open the following URL in your browser to authenticate:\n\n{}\n",
            auth_url
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let token = tokio::select! {
        token = token_rx => token.map_err(|_| "Callback server stopped before authorization completed"),
        _ = cancel.cancelled() => Err("Authorization cancelled"),
    };
    pb.finish_and_clear();

    // a failed send means the listener already exited
    let _ = shutdown_tx.send(());
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await.is_err() {
        warning!("Callback server did not shut down in time.");
    }

    Ok(SpotifyClient::new(token?.access_token))
}

/// Exchanges an authorization code for an access token.
///
/// Sends the PKCE verifier together with the client secret as HTTP Basic
/// credentials.
pub async fn exchange_code(code: &str, verifier: &str, credentials: &Credentials) -> Res<Token> {
    let redirect_uri = config::spotify_redirect_uri();
    let basic = STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));

    let client = Client::new();
    let response = client
        .post(config::spotify_apitoken_url())
        .header("Authorization", format!("Basic {}", basic))
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", credentials.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let reason = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error text".to_string());
        return Err(format!("token exchange failed with {}: {}", status, reason).into());
    }

    let token: Token = response.json().await?;
    Ok(token)
}
