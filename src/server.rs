use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{Res, api, types::CallbackState, warning};

/// Binds the OAuth callback listener and serves it in a background task.
///
/// The listener answers on `/` and `/callback` and keeps running until
/// `shutdown` fires (or its sender is dropped). Binding happens before this
/// returns, so an occupied port is reported to the caller.
pub async fn start_callback_server(
    addr: SocketAddr,
    state: Arc<CallbackState>,
    shutdown: oneshot::Receiver<()>,
) -> Res<JoinHandle<()>> {
    let app = Router::new()
        .route("/", get(api::callback))
        .route("/callback", get(api::callback))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("error starting auth server on {}: {}", addr, e))?;

    Ok(tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown.await;
            })
            .await;

        if let Err(e) = result {
            warning!("Callback server stopped with an error: {}", e);
        }
    }))
}
