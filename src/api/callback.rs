use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{spotify, types::CallbackState, warning};

/// Page shown once the token has been obtained. Closes its own tab after a
/// short countdown.
pub const AUTH_SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Authentication Complete</title>
  <style>
    html, body { height: 100%; margin: 0; }
    body {
      display: flex;
      justify-content: center;
      align-items: center;
      text-align: center;
      font-family: Arial, sans-serif;
    }
    p { font-size: 1.2em; }
  </style>
</head>
<body>
  <p>
    Authentication successful!<br>
    This browser tab will close itself in <span id="count">10</span> seconds.
  </p>
  <script>
    (function() {
      var seconds = 10;
      var el = document.getElementById("count");
      var timer = setInterval(function() {
        seconds--;
        if (seconds <= 0) {
          clearInterval(timer);
          window.close();
          window.open('', '_self');
          window.close();
        } else {
          el.textContent = seconds;
        }
      }, 1000);
    })();
  </script>
</body>
</html>"#;

const ALREADY_AUTHENTICATED_PAGE: &str = "<h4>Already authenticated. You can close this window.</h4>";

// query parameters are never echoed into a page
const AUTH_DENIED_PAGE: &str = "<h4>Authorization denied. You can close this window.</h4>";

fn token_failure() -> Response {
    (StatusCode::NOT_FOUND, "Couldn't get token").into_response()
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<CallbackState>>,
) -> Response {
    if shared_state.is_completed().await {
        return Html(ALREADY_AUTHENTICATED_PAGE).into_response();
    }

    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        return (StatusCode::FORBIDDEN, Html(AUTH_DENIED_PAGE)).into_response();
    }

    if params.get("state") != Some(&shared_state.expected_state) {
        return token_failure();
    }

    let Some(code) = params.get("code") else {
        return token_failure();
    };

    match spotify::auth::exchange_code(
        code,
        &shared_state.code_verifier,
        &shared_state.credentials,
    )
    .await
    {
        Ok(token) => {
            if shared_state.complete(token).await {
                Html(AUTH_SUCCESS_PAGE).into_response()
            } else {
                Html(ALREADY_AUTHENTICATED_PAGE).into_response()
            }
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            token_failure()
        }
    }
}
