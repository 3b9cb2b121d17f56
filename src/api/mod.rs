//! # API Module
//!
//! HTTP handlers for the local OAuth callback listener.
//!
//! - [`callback`] - completes the authorization-code flow: checks the
//!   anti-forgery `state`, exchanges the code for a token and hands the token
//!   to the waiting flow exactly once.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotify_shuffler::api::callback;
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .layer(Extension(state));
//! ```

mod callback;

pub use callback::{AUTH_SUCCESS_PAGE, callback};
