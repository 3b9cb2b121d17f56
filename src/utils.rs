use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::Res;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Anti-forgery `state` value: two groups of three random digits, `ddd-ddd`.
pub fn generate_state() -> String {
    format!("{}-{}", random_triple_digits(), random_triple_digits())
}

fn random_triple_digits() -> String {
    let mut rng = rand::rng();
    (0..3)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Builds the Spotify authorization URL for the PKCE code flow.
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
    code_challenge: &str,
) -> Res<String> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope),
            ("state", state),
        ],
    )?;
    Ok(url.to_string())
}
